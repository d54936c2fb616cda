//! Talking to the database: discovering its schema and executing statements against it.

pub mod database;
pub mod error;
pub mod introspection;
pub mod query;

use async_trait::async_trait;

use query_engine_metadata::metadata::{ResultSet, SchemaModel};

pub use database::PostgresDatabase;
pub use error::{DiscoveryError, ExecutionError};

/// Something that can tell us which tables and columns exist.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn fetch_schema(&self) -> Result<SchemaModel, DiscoveryError>;
}

/// Something that can run a single SQL statement and hand back its rows.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<ResultSet, ExecutionError>;
}
