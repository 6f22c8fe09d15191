use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use itertools::Itertools;
use tracing::{debug, trace_span};

use super::{
    models::{
        ingredient::{Ingredient, NewIngredient},
        recipe::{NewRecipe, Recipe},
        recipe_ingredient::RecipeIngredient,
    },
    recipe_query::RecipeFilter,
    recipe_repository::{FullRecipe, RecipeRepository, RepositoryError},
};

/// Process-local store with the same matching rules as the PostgreSQL one.
/// Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryRecipeRepository {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    recipes: BTreeMap<i32, Recipe>,
    ingredients: BTreeMap<i32, Ingredient>,
    links: Vec<RecipeIngredient>,
    last_recipe_id: i32,
    last_ingredient_id: i32,
}

impl MemoryState {
    fn full_recipe(&self, recipe: &Recipe) -> FullRecipe {
        let ingredients = self
            .links
            .iter()
            .filter(|link| link.recipe_id == recipe.id)
            .sorted_by_key(|link| link.position)
            .filter_map(|link| self.ingredients.get(&link.ingredient_id).cloned())
            .collect();

        FullRecipe::new(recipe.clone(), ingredients)
    }

    fn has_ingredient_like(&self, recipe_id: i32, pattern: &str) -> bool {
        self.links
            .iter()
            .filter(|link| link.recipe_id == recipe_id)
            .filter_map(|link| self.ingredients.get(&link.ingredient_id))
            .any(|ingredient| ilike(&ingredient.title, pattern))
    }

    fn matches(&self, recipe: &Recipe, filter: &RecipeFilter) -> bool {
        if let Some(text) = &filter.text {
            let pattern = format!("%{text}%");
            if !ilike(&recipe.title, &pattern) && !ilike(&recipe.instructions, &pattern) {
                return false;
            }
        }

        if let Some(include) = &filter.include {
            if !self.has_ingredient_like(recipe.id, include) {
                return false;
            }
        }

        if let Some(exclude) = &filter.exclude {
            if self.has_ingredient_like(recipe.id, exclude) {
                return false;
            }
        }

        filter.servings.map_or(true, |servings| recipe.serves == servings)
            && filter
                .vegetarian
                .map_or(true, |vegetarian| recipe.vegetarian == vegetarian)
    }

    fn link(&mut self, recipe_id: i32, ingredients: &[Ingredient]) {
        self.links.retain(|link| link.recipe_id != recipe_id);
        self.links.extend(
            ingredients
                .iter()
                .enumerate()
                .map(|(position, ingredient)| {
                    RecipeIngredient::new(recipe_id, ingredient.id, position as i32)
                }),
        );
    }
}

impl InMemoryRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

impl RecipeRepository for InMemoryRecipeRepository {
    fn find(&self, filter: &RecipeFilter) -> Result<Vec<FullRecipe>, RepositoryError> {
        let span = trace_span!("finding recipes in memory");
        let _guard = span.enter();

        let state = self.lock()?;

        let recipes: Vec<_> = state
            .recipes
            .values()
            .filter(|recipe| state.matches(recipe, filter))
            .map(|recipe| state.full_recipe(recipe))
            .collect();
        debug!(count = recipes.len(), "Loaded recipes");

        Ok(recipes)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<FullRecipe>, RepositoryError> {
        let state = self.lock()?;

        Ok(state.recipes.get(&id).map(|recipe| state.full_recipe(recipe)))
    }

    fn find_by_title(&self, title: &str) -> Result<Option<Recipe>, RepositoryError> {
        let state = self.lock()?;

        Ok(state
            .recipes
            .values()
            .find(|recipe| recipe.title == title)
            .cloned())
    }

    fn find_ingredient_by_title(
        &self,
        title: &str,
    ) -> Result<Option<Ingredient>, RepositoryError> {
        let state = self.lock()?;

        Ok(state
            .ingredients
            .values()
            .find(|ingredient| ingredient.title == title)
            .cloned())
    }

    fn insert_ingredient(&self, new_ingredient: &NewIngredient) -> Result<Ingredient, RepositoryError> {
        let mut state = self.lock()?;

        state.last_ingredient_id += 1;
        let ingredient = Ingredient::new(state.last_ingredient_id, new_ingredient.title.clone());
        state.ingredients.insert(ingredient.id, ingredient.clone());

        Ok(ingredient)
    }

    fn insert_recipe(
        &self,
        new_recipe: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError> {
        let mut state = self.lock()?;

        state.last_recipe_id += 1;
        let recipe = new_recipe.clone().with_id(state.last_recipe_id);
        state.recipes.insert(recipe.id, recipe.clone());
        state.link(recipe.id, ingredients);

        Ok(FullRecipe::new(recipe, ingredients.to_vec()))
    }

    fn update_recipe(
        &self,
        id: i32,
        changes: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError> {
        let mut state = self.lock()?;

        let recipe = changes.clone().with_id(id);
        state.recipes.insert(id, recipe.clone());
        state.link(id, ingredients);

        Ok(FullRecipe::new(recipe, ingredients.to_vec()))
    }

    fn delete_recipe(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;

        let removed = state.recipes.remove(&id).is_some();
        state.links.retain(|link| link.recipe_id != id);

        Ok(removed)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Any,
    One,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        });
    }

    tokens
}

/// Case-insensitive SQL `LIKE`: `%` matches any run, `_` a single character,
/// backslash escapes.
fn ilike(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.to_lowercase().chars().collect();
    let tokens = tokenize(&pattern.to_lowercase());

    let (mut v, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match tokens.get(p) {
            Some(Token::Any) => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(Token::One) => {
                v += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if *c == value[v] => {
                v += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, mark)) => {
                    backtrack = Some((star, mark + 1));
                    p = star + 1;
                    v = mark + 1;
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|token| *token == Token::Any)
}
