use diesel::{insert_into, prelude::*, PgConnection};
use lombok::AllArgsConstructor;
use tracing::{debug, trace_span};

use super::{
    connection::PgPool,
    models::{
        ingredient::{Ingredient, NewIngredient},
        recipe::{NewRecipe, Recipe},
        recipe_ingredient::RecipeIngredient,
    },
    recipe_query::{find_query, RecipeFilter},
    recipe_repository::{FullRecipe, RecipeRepository, RepositoryError},
    schema::{ingredient, recipe, recipe_ingredient},
};

#[derive(AllArgsConstructor, Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl RecipeRepository for PgRecipeRepository {
    fn find(&self, filter: &RecipeFilter) -> Result<Vec<FullRecipe>, RepositoryError> {
        let span = trace_span!("finding recipes");
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        let recipes = find_query(filter).load::<Recipe>(&mut connection)?;
        debug!(count = recipes.len(), "Loaded recipes");

        Ok(with_ingredients(&mut connection, recipes)?)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<FullRecipe>, RepositoryError> {
        let span = trace_span!("finding recipe by id", id);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        let found = recipe::table
            .find(id)
            .select(Recipe::as_select())
            .first(&mut connection)
            .optional()?;

        match found {
            Some(found) => Ok(with_ingredients(&mut connection, vec![found])?.pop()),
            None => Ok(None),
        }
    }

    fn find_by_title(&self, title: &str) -> Result<Option<Recipe>, RepositoryError> {
        let span = trace_span!("finding recipe by title", title);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        Ok(recipe::table
            .filter(recipe::title.eq(title))
            .select(Recipe::as_select())
            .first(&mut connection)
            .optional()?)
    }

    fn find_ingredient_by_title(
        &self,
        title: &str,
    ) -> Result<Option<Ingredient>, RepositoryError> {
        let span = trace_span!("finding ingredient by title", title);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        Ok(ingredient::table
            .filter(ingredient::title.eq(title))
            .select(Ingredient::as_select())
            .first(&mut connection)
            .optional()?)
    }

    fn insert_ingredient(&self, new_ingredient: &NewIngredient) -> Result<Ingredient, RepositoryError> {
        let span = trace_span!("inserting ingredient", title = %new_ingredient.title);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        Ok(insert_into(ingredient::table)
            .values(new_ingredient)
            .returning(Ingredient::as_returning())
            .get_result(&mut connection)?)
    }

    fn insert_recipe(
        &self,
        new_recipe: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError> {
        let span = trace_span!("inserting recipe", title = %new_recipe.title);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        let saved = connection.transaction::<_, diesel::result::Error, _>(|connection| {
            let saved = insert_into(recipe::table)
                .values(new_recipe)
                .returning(Recipe::as_returning())
                .get_result(connection)?;

            link_ingredients(connection, saved.id, ingredients)?;

            Ok(saved)
        })?;

        Ok(FullRecipe::new(saved, ingredients.to_vec()))
    }

    fn update_recipe(
        &self,
        id: i32,
        changes: &NewRecipe,
        ingredients: &[Ingredient],
    ) -> Result<FullRecipe, RepositoryError> {
        let span = trace_span!("updating recipe", id);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        let saved = connection.transaction::<_, diesel::result::Error, _>(|connection| {
            let saved = diesel::update(recipe::table.find(id))
                .set(changes)
                .returning(Recipe::as_returning())
                .get_result(connection)?;

            // Membership is replaced, never diffed
            diesel::delete(recipe_ingredient::table.filter(recipe_ingredient::recipe_id.eq(id)))
                .execute(connection)?;
            link_ingredients(connection, id, ingredients)?;

            Ok(saved)
        })?;

        Ok(FullRecipe::new(saved, ingredients.to_vec()))
    }

    fn delete_recipe(&self, id: i32) -> Result<bool, RepositoryError> {
        let span = trace_span!("deleting recipe", id);
        let _guard = span.enter();

        let mut connection = self.pool.get()?;

        // Association rows go with the recipe through ON DELETE CASCADE
        let deleted = diesel::delete(recipe::table.find(id)).execute(&mut connection)?;

        Ok(deleted > 0)
    }
}

fn link_ingredients(
    connection: &mut PgConnection,
    recipe_id: i32,
    ingredients: &[Ingredient],
) -> QueryResult<()> {
    if ingredients.is_empty() {
        return Ok(());
    }

    let links: Vec<_> = ingredients
        .iter()
        .enumerate()
        .map(|(position, ingredient)| {
            RecipeIngredient::new(recipe_id, ingredient.id, position as i32)
        })
        .collect();

    insert_into(recipe_ingredient::table)
        .values(&links)
        .execute(connection)?;

    Ok(())
}

fn with_ingredients(
    connection: &mut PgConnection,
    recipes: Vec<Recipe>,
) -> QueryResult<Vec<FullRecipe>> {
    let links = RecipeIngredient::belonging_to(&recipes)
        .inner_join(ingredient::table)
        .order(recipe_ingredient::position.asc())
        .select((RecipeIngredient::as_select(), Ingredient::as_select()))
        .load::<(RecipeIngredient, Ingredient)>(connection)?;

    Ok(links
        .grouped_by(&recipes)
        .into_iter()
        .zip(recipes)
        .map(|(links, recipe)| {
            let ingredients = links
                .into_iter()
                .map(|(_, ingredient)| ingredient)
                .collect();
            FullRecipe::new(recipe, ingredients)
        })
        .collect())
}
