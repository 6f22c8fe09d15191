use serde::{Deserialize, Serialize};

use crate::database::{models::recipe::NewRecipe, recipe_repository::FullRecipe};

use super::error_dto::ErrorDto;

const NOT_BLANK: &str = "must not be blank";
const NOT_NULL: &str = "must not be null";
const POSITIVE: &str = "must be greater than or equal to 1";

/// Wire representation of a recipe, ingredients are listed by title.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDto {
    pub recipe_id: Option<i32>,
    pub title: String,
    pub instructions: String,
    pub serves: i32,
    pub vegetarian: bool,
    pub ingredients: Vec<String>,
}

impl RecipeDto {
    pub fn to_new_recipe(&self) -> NewRecipe {
        NewRecipe::new(
            self.title.clone(),
            self.instructions.clone(),
            self.serves,
            self.vegetarian,
        )
    }
}

impl From<FullRecipe> for RecipeDto {
    fn from(full: FullRecipe) -> Self {
        Self {
            recipe_id: Some(full.recipe.id),
            title: full.recipe.title,
            instructions: full.recipe.instructions,
            serves: full.recipe.serves,
            vegetarian: full.recipe.vegetarian,
            ingredients: full
                .ingredients
                .into_iter()
                .map(|ingredient| ingredient.title)
                .collect(),
        }
    }
}

/// Request body as received, before any field is checked.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    pub recipe_id: Option<i32>,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub serves: Option<i32>,
    pub vegetarian: Option<bool>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipePayload {
    /// Reports every invalid field at once.
    pub fn validate(self) -> Result<RecipeDto, Vec<ErrorDto>> {
        let mut errors = Vec::new();

        let title = required_text(self.title, "title", &mut errors);
        let instructions = required_text(self.instructions, "instructions", &mut errors);

        let serves = match self.serves {
            Some(serves) if serves >= 1 => Some(serves),
            Some(_) => {
                errors.push(ErrorDto::for_field("serves", POSITIVE));
                None
            }
            None => {
                errors.push(ErrorDto::for_field("serves", NOT_NULL));
                None
            }
        };

        if self.vegetarian.is_none() {
            errors.push(ErrorDto::for_field("vegetarian", NOT_NULL));
        }

        match &self.ingredients {
            None => errors.push(ErrorDto::for_field("ingredients", NOT_NULL)),
            Some(ingredients) => errors.extend(
                ingredients
                    .iter()
                    .enumerate()
                    .filter(|(_, ingredient)| ingredient.trim().is_empty())
                    .map(|(index, _)| {
                        ErrorDto::for_field(&format!("ingredients[{index}]"), NOT_BLANK)
                    }),
            ),
        }

        match (title, instructions, serves, self.vegetarian, self.ingredients) {
            (Some(title), Some(instructions), Some(serves), Some(vegetarian), Some(ingredients))
                if errors.is_empty() =>
            {
                Ok(RecipeDto {
                    recipe_id: self.recipe_id,
                    title,
                    instructions,
                    serves,
                    vegetarian,
                    ingredients,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(value: Option<String>, field: &str, errors: &mut Vec<ErrorDto>) -> Option<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => {
            errors.push(ErrorDto::for_field(field, NOT_BLANK));
            None
        }
    }
}
