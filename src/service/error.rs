use thiserror::Error;

use crate::{database::recipe_repository::RepositoryError, dto::error_dto::ErrorDto};

pub const RECIPE_SAME_TITLE: &str = "There is already one recipe with the same title";
pub const RECIPE_NOT_FOUND: &str = "This recipe was not found in our database";
pub const RECIPE_ID_SHOULD_BE_EMPTY: &str = "The id of the recipe should be empty";
pub const INTERNAL_SERVER_ERROR: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Bad request: {0:?}")]
    BadRequest(Vec<ErrorDto>),

    #[error("Already exists: {0:?}")]
    AlreadyExists(Vec<ErrorDto>),

    #[error("Not found: {0:?}")]
    NotFound(Vec<ErrorDto>),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn bad_request(field: &str, message: &str) -> Self {
        Self::BadRequest(vec![ErrorDto::for_field(field, message)])
    }

    pub fn already_exists(field: &str, message: &str) -> Self {
        Self::AlreadyExists(vec![ErrorDto::for_field(field, message)])
    }

    pub fn not_found(field: &str, message: &str) -> Self {
        Self::NotFound(vec![ErrorDto::for_field(field, message)])
    }

    /// Field errors reported to the client, `None` for unexpected failures.
    pub fn errors(&self) -> Option<&[ErrorDto]> {
        match self {
            Self::BadRequest(errors) | Self::AlreadyExists(errors) | Self::NotFound(errors) => {
                Some(errors)
            }
            Self::Repository(_) => None,
        }
    }
}
