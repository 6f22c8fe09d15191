use diesel::r2d2::PoolError;
use lombok::AllArgsConstructor;
use thiserror::Error;

use super::{
    models::{
        ingredient::{Ingredient, NewIngredient},
        recipe::{NewRecipe, Recipe},
    },
    recipe_query::RecipeFilter,
};

/// A recipe row together with its ingredients, in submission order.
#[derive(AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
pub struct FullRecipe {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Recipe store lock was poisoned")]
    Poisoned,
}

/// Persistence seam of the recipe service.
///
/// Writes replace the whole ingredient membership of a recipe; callers pass
/// ingredients that already exist in the store.
pub trait RecipeRepository: Send + Sync {
    fn find(&self, filter: &RecipeFilter) -> Result<Vec<FullRecipe>, RepositoryError>;

    fn find_by_id(&self, id: i32) -> Result<Option<FullRecipe>, RepositoryError>;

    fn find_by_title(&self, title: &str) -> Result<Option<Recipe>, RepositoryError>;

    fn find_ingredient_by_title(&self, title: &str)
        -> Result<Option<Ingredient>, RepositoryError>;

    fn insert_ingredient(&self, ingredient: &NewIngredient) -> Result<Ingredient, RepositoryError>;

    fn insert_recipe(
        &self,
        recipe: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError>;

    fn update_recipe(
        &self,
        id: i32,
        recipe: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError>;

    /// Returns whether a row was removed.
    fn delete_recipe(&self, id: i32) -> Result<bool, RepositoryError>;
}
