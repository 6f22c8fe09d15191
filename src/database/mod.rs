pub mod connection;
pub mod memory_repository;
pub mod models;
pub mod pg_repository;
pub mod recipe_query;
pub mod recipe_repository;
pub mod schema;

use std::sync::Arc;

use tracing::info;

use crate::config::Storage;
use connection::{ensure_schema, establish_pooled_connection};
use memory_repository::InMemoryRecipeRepository;
use pg_repository::PgRecipeRepository;
use recipe_repository::{RecipeRepository, RepositoryError};

/// Opens the store selected by the configuration.
pub fn open_repository(storage: &Storage) -> Result<Arc<dyn RecipeRepository>, RepositoryError> {
    match storage {
        Storage::Postgres {
            database_url,
            pool_size,
        } => {
            info!(pool_size, "Using PostgreSQL storage");
            let pool = establish_pooled_connection(database_url, *pool_size)?;
            ensure_schema(&pool)?;

            Ok(Arc::new(PgRecipeRepository::new(pool)))
        }
        Storage::Memory => {
            info!("Using in-memory storage, data is lost on shutdown");
            Ok(Arc::new(InMemoryRecipeRepository::new()))
        }
    }
}
