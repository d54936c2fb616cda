//! The collaborators used by the command line, built once from the configuration.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use nl2sql_configuration::{Configuration, PoolSettings};
use query_engine_execution::PostgresDatabase;

use crate::generator::{GenerationError, OpenRouterGenerator};

pub struct State {
    pub database: PostgresDatabase,
    pub generator: OpenRouterGenerator,
}

/// Create the connection pool and the model client.
///
/// The pool connects lazily, so an unreachable database shows up on first use rather than
/// here.
pub fn create_state(configuration: &Configuration) -> Result<State, InitializationError> {
    let pool = pool_options(&configuration.pool_settings)
        .connect_lazy(&configuration.connection_uri)
        .map_err(InitializationError::UnableToCreatePool)?;
    let database = PostgresDatabase::new(pool, configuration.schema_name.clone());

    let generator = OpenRouterGenerator::new(configuration.model.clone())
        .map_err(InitializationError::UnableToCreateGenerator)?;

    tracing::info!(
        schema = %configuration.schema_name,
        model = %generator.model(),
        "Initialized state"
    );
    Ok(State {
        database,
        generator,
    })
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialize connection pool: {0}")]
    UnableToCreatePool(sqlx::Error),
    #[error("unable to initialize the model client: {0}")]
    UnableToCreateGenerator(GenerationError),
}
