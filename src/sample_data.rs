//! Five recipes used to seed a fresh store and as a test fixture.

use crate::dto::recipe_dto::RecipeDto;

fn recipe(title: &str, instructions: &str, vegetarian: bool, serves: i32, ingredients: &[&str]) -> RecipeDto {
    RecipeDto {
        recipe_id: None,
        title: title.to_owned(),
        instructions: instructions.to_owned(),
        serves,
        vegetarian,
        ingredients: ingredients.iter().map(|&title| title.to_owned()).collect(),
    }
}

pub fn create() -> Vec<RecipeDto> {
    vec![
        recipe(
            "Red Curry",
            "Mix all the vegetables, cook for 30 minutes and it's ready",
            true,
            2,
            &["Carrot", "Chickpea", "Cumin", "Rice", "Potato", "Basil"],
        ),
        recipe(
            "Enhanced Salmon",
            "Put the salmon in the oven with lots of vegetables and wait for an hour and a half",
            false,
            3,
            &["Salmon", "Bean", "Cumin", "Chickpea", "Tomato"],
        ),
        recipe(
            "Pad Thai",
            "Soak the noodle in cold water for 15 minutes and 30 more minutes in the pan and it is ready",
            true,
            4,
            &["Rice Noodle", "Carrot", "Tomato", "Basil", "Lettuce"],
        ),
        recipe(
            "Mexican Taco",
            "Just fry everything",
            true,
            1,
            &["Rice", "Bean", "Basil"],
        ),
        recipe(
            "French Fries",
            "Slice the potato and fry it",
            true,
            2,
            &["Potato"],
        ),
    ]
}
