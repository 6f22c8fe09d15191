use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use tracing::{info, trace, trace_span};

use super::recipe_repository::RepositoryError;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA: &str = include_str!("../../migrations/2024-05-01-120000_create_recipes/up.sql");

pub fn establish_pooled_connection(database_url: &str, pool_size: u32) -> Result<PgPool, PoolError> {
    let span = trace_span!("establishing pooled connection");
    let _guard = span.enter();

    trace!("Creating manager");
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    trace!("Creating pool");
    Pool::builder().max_size(pool_size).build(manager)
}

/// Applies the recipe schema. Every statement is `IF NOT EXISTS`, so this is
/// safe to run against a database the diesel CLI already migrated.
pub fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    let span = trace_span!("ensuring schema");
    let _guard = span.enter();

    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA)?;

    info!("Database schema is up to date");
    Ok(())
}
