use diesel::prelude::*;
use lombok::AllArgsConstructor;

#[derive(
    Queryable, Selectable, Identifiable, AllArgsConstructor, Debug, Clone, PartialEq, Eq,
)]
#[diesel(table_name = crate::database::schema::recipe)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub instructions: String,
    pub serves: i32,
    pub vegetarian: bool,
}

/// Every mutable column of a recipe, used both for inserts and full overwrites.
#[derive(Insertable, AsChangeset, AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::recipe)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub serves: i32,
    pub vegetarian: bool,
}

impl NewRecipe {
    pub fn with_id(self, id: i32) -> Recipe {
        Recipe::new(
            id,
            self.title,
            self.instructions,
            self.serves,
            self.vegetarian,
        )
    }
}
