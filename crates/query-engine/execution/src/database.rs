//! A Postgres database, reached through a connection pool.

use async_trait::async_trait;
use sqlx::PgPool;

use query_engine_metadata::metadata::{ResultSet, SchemaModel};

use crate::error::{DiscoveryError, ExecutionError};
use crate::{introspection, query, SchemaSource, StatementExecutor};

#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    schema_name: String,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool, schema_name: impl Into<String>) -> Self {
        PostgresDatabase {
            pool,
            schema_name: schema_name.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The schema whose tables are discovered.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }
}

#[async_trait]
impl SchemaSource for PostgresDatabase {
    async fn fetch_schema(&self) -> Result<SchemaModel, DiscoveryError> {
        introspection::fetch_schema(&self.pool, &self.schema_name).await
    }
}

#[async_trait]
impl StatementExecutor for PostgresDatabase {
    async fn execute(&self, sql: &str) -> Result<ResultSet, ExecutionError> {
        query::execute(&self.pool, sql).await
    }
}
