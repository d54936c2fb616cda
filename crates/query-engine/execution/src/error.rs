//! Errors for schema discovery and statement execution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("unable to read the database schema: {0}")]
    Database(#[from] sqlx::Error),
    #[error("schema discovery is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("there is no statement to execute")]
    EmptyStatement,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unexpected result from the database: {0}")]
    UnexpectedResult(String),
    #[error("statement failed: {0}")]
    Failed(String),
}
