//! Stand-ins for the database and the model.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use nl2sql::generator::{GenerationError, Generator};
use query_engine_execution::{DiscoveryError, ExecutionError, SchemaSource, StatementExecutor};
use query_engine_metadata::metadata::{ResultSet, SchemaModel};
use query_engine_sql::sql::normalize::normalize_sql;
use query_engine_translation::translation::prompt::PromptMessage;

/// Always discovers the same schema.
pub struct StaticSchemaSource(pub SchemaModel);

#[async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn fetch_schema(&self) -> Result<SchemaModel, DiscoveryError> {
        Ok(self.0.clone())
    }
}

/// Never manages to discover anything.
pub struct FailingSchemaSource;

#[async_trait]
impl SchemaSource for FailingSchemaSource {
    async fn fetch_schema(&self) -> Result<SchemaModel, DiscoveryError> {
        Err(DiscoveryError::Unavailable(
            "connection refused".to_string(),
        ))
    }
}

/// Answers every prompt with the same text, and remembers the prompts it was sent.
pub struct StaticGenerator {
    response: String,
    calls: Mutex<Vec<Vec<PromptMessage>>>,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        StaticGenerator {
            response: response.into(),
            calls: Mutex::new(vec![]),
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<PromptMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for StaticGenerator {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(self.response.clone())
    }
}

/// Every request fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn complete(&self, _messages: &[PromptMessage]) -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 401,
            details: "No auth credentials found".to_string(),
        })
    }
}

/// Answers statements it knows about, keyed by their normalized text, and fails the rest.
#[derive(Default)]
pub struct InMemoryExecutor {
    answers: HashMap<String, ResultSet>,
    executed: Mutex<Vec<String>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        InMemoryExecutor::default()
    }

    #[must_use]
    pub fn with_answer(mut self, sql: &str, result: ResultSet) -> Self {
        self.answers.insert(normalize_sql(sql), result);
        self
    }

    /// Every statement executed so far, as given.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementExecutor for InMemoryExecutor {
    async fn execute(&self, sql: &str) -> Result<ResultSet, ExecutionError> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.answers
            .get(&normalize_sql(sql))
            .cloned()
            .ok_or_else(|| ExecutionError::Failed(format!("relation does not exist: {sql}")))
    }
}
