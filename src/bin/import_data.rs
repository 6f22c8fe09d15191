#![warn(clippy::all)]

use std::{env, fs};

use anyhow::{bail, Context, Result};
use recipes::{
    config::Config,
    database::open_repository,
    dto::recipe_dto::{RecipeDto, RecipePayload},
    logging::init_tracing,
    sample_data,
    service::{error::ServiceError, recipe_service::RecipeService},
};
use serde_json::from_str;
use tracing::{info, warn};

/// Usage: `import-data [recipes.json]`
///
/// Without a file the built-in sample recipes are imported. Recipes whose title
/// is already taken are skipped.
fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level).context("Unable to set global subscriber")?;

    let recipes = match env::args().nth(1) {
        Some(path) => read_recipes(&path)?,
        None => {
            info!("No file given, importing sample data");
            sample_data::create()
        }
    };

    let repository = open_repository(&config.storage).context("Failed to open recipe storage")?;
    let service = RecipeService::new(repository);

    let mut imported = 0;
    for recipe in recipes {
        let title = recipe.title.clone();
        match service.save(recipe) {
            Ok(saved) => {
                info!(id = ?saved.recipe_id, title = %saved.title, "Imported recipe");
                imported += 1;
            }
            Err(ServiceError::AlreadyExists(_)) => {
                warn!(title = %title, "Recipe already exists, skipping");
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to import `{title}`")),
        }
    }

    info!("Imported {imported} recipes");
    Ok(())
}

fn read_recipes(path: &str) -> Result<Vec<RecipeDto>> {
    let json = fs::read_to_string(path).with_context(|| format!("Can't read {path}"))?;
    let payloads: Vec<RecipePayload> =
        from_str(&json).with_context(|| format!("Can't parse {path}"))?;

    let mut recipes = Vec::with_capacity(payloads.len());
    for (index, payload) in payloads.into_iter().enumerate() {
        match payload.validate() {
            Ok(recipe) => recipes.push(recipe),
            Err(errors) => {
                let details: Vec<_> = errors
                    .iter()
                    .map(|error| {
                        format!(
                            "{}: {}",
                            error.field.as_deref().unwrap_or("recipe"),
                            error.message
                        )
                    })
                    .collect();
                bail!("Recipe #{index} in {path} is invalid: {}", details.join(", "));
            }
        }
    }

    Ok(recipes)
}
