use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    database::recipe_query::RecipeFilter,
    dto::{
        error_dto::ErrorDto,
        recipe_dto::{RecipeDto, RecipePayload},
    },
    service::{error::ServiceError, recipe_service::RecipeService},
};

use super::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Query string of `GET /v1/recipe/find`. Numbers and flags arrive as text so
/// that empty values can be treated as absent.
#[derive(Deserialize, Debug, Default)]
pub struct FindParams {
    pub text: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub servings: Option<String>,
    pub vegetarian: Option<String>,
}

impl FindParams {
    pub fn into_filter(self) -> Result<RecipeFilter, Vec<ErrorDto>> {
        let mut errors = Vec::new();

        let servings = parse_optional::<i32>(self.servings, "servings", &mut errors);
        let vegetarian = parse_optional::<bool>(self.vegetarian, "vegetarian", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RecipeFilter::new(
            self.text,
            self.include,
            self.exclude,
            servings,
            vegetarian,
        ))
    }
}

fn parse_optional<T: std::str::FromStr>(
    value: Option<String>,
    field: &str,
    errors: &mut Vec<ErrorDto>,
) -> Option<T> {
    let value = value.filter(|value| !value.trim().is_empty())?;

    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(ErrorDto::for_field(
                field,
                &format!("`{value}` is not a valid value"),
            ));
            None
        }
    }
}

// Diesel is blocking, keep it off the async workers
async fn run_blocking<T, F>(service: RecipeService, task: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&RecipeService) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || task(&service))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {e}")))?
        .map_err(ApiError::from)
}

/// GET /v1/recipe/find
pub async fn find_recipes(
    State(state): State<AppState>,
    params: Result<Query<FindParams>, QueryRejection>,
) -> ApiResult<Json<Vec<RecipeDto>>> {
    let Query(params) = params?;
    let filter = params.into_filter().map_err(ApiError::Validation)?;

    let recipes = run_blocking(state.service, move |service| service.find(&filter)).await?;
    info!(count = recipes.len(), "Recipes found");

    Ok(Json(recipes))
}

/// POST /v1/recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeDto>> {
    let Json(payload) = payload?;
    let recipe = payload.validate().map_err(ApiError::Validation)?;

    let saved = run_blocking(state.service, move |service| service.save(recipe)).await?;

    Ok(Json(saved))
}

/// PUT /v1/recipe
pub async fn upsert_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeDto>> {
    let Json(payload) = payload?;
    let recipe = payload.validate().map_err(ApiError::Validation)?;

    let saved = run_blocking(state.service, move |service| service.save_or_update(recipe)).await?;

    Ok(Json(saved))
}

/// DELETE /v1/recipe/:recipe_id
pub async fn delete_recipe(
    State(state): State<AppState>,
    recipe_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(recipe_id) = recipe_id?;

    run_blocking(state.service, move |service| service.delete(recipe_id)).await?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_are_absent() {
        let params = FindParams {
            text: Some("".to_owned()),
            servings: Some("".to_owned()),
            vegetarian: Some(" ".to_owned()),
            ..FindParams::default()
        };

        assert_eq!(params.into_filter().unwrap(), RecipeFilter::default());
    }

    #[test]
    fn test_params_are_parsed() {
        let params = FindParams {
            include: Some("basil".to_owned()),
            servings: Some("2".to_owned()),
            vegetarian: Some("true".to_owned()),
            ..FindParams::default()
        };

        let filter = params.into_filter().unwrap();

        assert_eq!(filter.include.as_deref(), Some("basil"));
        assert_eq!(filter.servings, Some(2));
        assert_eq!(filter.vegetarian, Some(true));
    }

    #[test]
    fn test_invalid_params_are_reported_per_field() {
        let params = FindParams {
            servings: Some("two".to_owned()),
            vegetarian: Some("maybe".to_owned()),
            ..FindParams::default()
        };

        let errors = params.into_filter().unwrap_err();
        let fields: Vec<_> = errors
            .iter()
            .filter_map(|error| error.field.as_deref())
            .collect();

        assert_eq!(fields, vec!["servings", "vegetarian"]);
    }
}
