use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::{ingredient::Ingredient, recipe::Recipe};

// Association row, position keeps the order the ingredients were submitted in
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Insertable,
    AllArgsConstructor,
    Debug,
    Clone,
    PartialEq,
    Eq,
)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(table_name = crate::database::schema::recipe_ingredient)]
#[diesel(primary_key(recipe_id, ingredient_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub position: i32,
}
