use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    dto::error_dto::ErrorDto,
    service::error::{ServiceError, INTERNAL_SERVER_ERROR},
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0:?}")]
    Validation(Vec<ErrorDto>),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![ErrorDto::for_field("body", &rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(vec![ErrorDto::for_field("query", &rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(vec![ErrorDto::for_field("recipeId", &rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            ApiError::Service(ServiceError::BadRequest(errors))
            | ApiError::Service(ServiceError::AlreadyExists(errors)) => {
                (StatusCode::BAD_REQUEST, errors)
            }
            ApiError::Service(ServiceError::NotFound(errors)) => (StatusCode::NOT_FOUND, errors),
            ApiError::Service(ServiceError::Repository(e)) => {
                error!("Repository failure: {e}");
                internal()
            }
            ApiError::Internal(message) => {
                error!("Internal failure: {message}");
                internal()
            }
        };

        if status.is_client_error() {
            warn!(%status, ?errors, "Request rejected");
        }

        (status, Json(errors)).into_response()
    }
}

fn internal() -> (StatusCode, Vec<ErrorDto>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        vec![ErrorDto::general(INTERNAL_SERVER_ERROR)],
    )
}
