use diesel::prelude::*;
use lombok::AllArgsConstructor;

#[derive(
    Queryable,
    Selectable,
    Identifiable,
    AllArgsConstructor,
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
)]
#[diesel(table_name = crate::database::schema::ingredient)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub title: String,
}

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = crate::database::schema::ingredient)]
pub struct NewIngredient {
    pub title: String,
}
