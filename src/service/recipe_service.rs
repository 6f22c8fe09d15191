use std::sync::Arc;

use itertools::Itertools;
use lombok::AllArgsConstructor;
use tracing::{debug, info, trace_span};

use crate::{
    database::{
        models::ingredient::{Ingredient, NewIngredient},
        recipe_query::RecipeFilter,
        recipe_repository::RecipeRepository,
    },
    dto::recipe_dto::RecipeDto,
};

use super::error::{
    ServiceError, RECIPE_ID_SHOULD_BE_EMPTY, RECIPE_NOT_FOUND, RECIPE_SAME_TITLE,
};

/// Business rules on top of a [`RecipeRepository`].
#[derive(AllArgsConstructor, Clone)]
pub struct RecipeService {
    repository: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    pub fn find(&self, filter: &RecipeFilter) -> Result<Vec<RecipeDto>, ServiceError> {
        let span = trace_span!("find", ?filter);
        let _guard = span.enter();

        Ok(self
            .repository
            .find(filter)?
            .into_iter()
            .map(RecipeDto::from)
            .collect())
    }

    /// Creates a recipe. Clients must not pick the identifier and titles are
    /// unique.
    pub fn save(&self, recipe: RecipeDto) -> Result<RecipeDto, ServiceError> {
        let span = trace_span!("save", title = %recipe.title);
        let _guard = span.enter();

        if recipe.recipe_id.is_some() {
            return Err(ServiceError::bad_request(
                "recipeId",
                RECIPE_ID_SHOULD_BE_EMPTY,
            ));
        }

        if self.repository.find_by_title(&recipe.title)?.is_some() {
            return Err(ServiceError::already_exists("title", RECIPE_SAME_TITLE));
        }

        let ingredients = self.resolve_ingredients(&recipe.ingredients)?;
        let saved = self
            .repository
            .insert_recipe(&recipe.to_new_recipe(), &ingredients)?;
        info!(id = saved.recipe.id, title = %saved.recipe.title, "Recipe created");

        Ok(saved.into())
    }

    /// Creates the recipe when it has no identifier, otherwise overwrites every
    /// field and the whole ingredient list of the existing one.
    pub fn save_or_update(&self, recipe: RecipeDto) -> Result<RecipeDto, ServiceError> {
        let Some(id) = recipe.recipe_id else {
            return self.save(recipe);
        };

        let span = trace_span!("update", id);
        let _guard = span.enter();

        if self.repository.find_by_id(id)?.is_none() {
            return Err(ServiceError::not_found("recipeId", RECIPE_NOT_FOUND));
        }

        if let Some(other) = self.repository.find_by_title(&recipe.title)? {
            if other.id != id {
                return Err(ServiceError::already_exists("title", RECIPE_SAME_TITLE));
            }
        }

        let ingredients = self.resolve_ingredients(&recipe.ingredients)?;
        let saved = self
            .repository
            .update_recipe(id, &recipe.to_new_recipe(), &ingredients)?;
        info!(id, title = %saved.recipe.title, "Recipe updated");

        Ok(saved.into())
    }

    pub fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let span = trace_span!("delete", id);
        let _guard = span.enter();

        if !self.repository.delete_recipe(id)? {
            return Err(ServiceError::not_found("recipeId", RECIPE_NOT_FOUND));
        }
        info!(id, "Recipe deleted");

        Ok(())
    }

    // Reuses the ingredient row with the same title or creates it
    fn resolve_ingredients(&self, titles: &[String]) -> Result<Vec<Ingredient>, ServiceError> {
        titles
            .iter()
            .unique()
            .map(|title| match self.repository.find_ingredient_by_title(title)? {
                Some(ingredient) => Ok(ingredient),
                None => {
                    debug!(title = %title, "Creating ingredient");
                    Ok(self
                        .repository
                        .insert_ingredient(&NewIngredient::new(title.clone()))?)
                }
            })
            .collect()
    }
}
