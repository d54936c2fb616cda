//! From a question to SQL: discover the schema, settle it with the requester, then generate.

use serde::Serialize;
use tracing::{info_span, Instrument};

use nl2sql_configuration::ConfirmationSettings;
use query_engine_execution::SchemaSource;
use query_engine_metadata::metadata::SchemaModel;
use query_engine_translation::translation::confirmation::{
    auto_confirm, run_confirmation, ConfirmationOutcome, ConfirmationSession, ConfirmationState,
    UserTurnProvider,
};

use crate::generator::{generate_sql, Generator};

/// How the schema used for generation was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationStatus {
    /// The requester confirmed it.
    Confirmed,
    /// The requester ran out of attempts; the latest corrected schema was used.
    FallbackConfirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub status: GenerationStatus,
    /// Candidate statements, possibly empty, possibly a single `-- Error` candidate.
    pub sql_queries: Vec<String>,
    pub confirmed_schema: SchemaModel,
    pub nl_query: String,
    /// Why the schema could not be discovered, when it could not.
    pub discovery_failure: Option<String>,
}

impl GenerationOutcome {
    pub fn is_confirmed(&self) -> bool {
        self.status == GenerationStatus::Confirmed
    }

    /// The first candidate statement, if any.
    pub fn first_query(&self) -> Option<&str> {
        self.sql_queries.first().map(String::as_str)
    }
}

/// Generate SQL for `nl_query`, asking `provider` to confirm or correct the schema first.
///
/// The provider is called synchronously on the current task. A provider that blocks, such as
/// [`crate::console::ConsoleTurns`] reading stdin, holds its runtime worker thread until the
/// requester answers; run this on a runtime with a worker to spare when other tasks must make
/// progress meanwhile.
pub async fn interactive_sql_generation(
    nl_query: &str,
    source: &dyn SchemaSource,
    generator: &dyn Generator,
    provider: &mut dyn UserTurnProvider,
    settings: &ConfirmationSettings,
) -> GenerationOutcome {
    async {
        let (schema, discovery_failure) = discover_schema(source).await;
        let session = ConfirmationSession::new(schema, nl_query, settings.max_attempts);
        let confirmation = run_confirmation(session, provider);
        generate(generator, confirmation, discovery_failure).await
    }
    .instrument(info_span!("Interactive SQL generation"))
    .await
}

/// Generate SQL for `nl_query` from the schema exactly as discovered.
pub async fn generate_sql_with_auto_confirm(
    nl_query: &str,
    source: &dyn SchemaSource,
    generator: &dyn Generator,
) -> GenerationOutcome {
    async {
        let (schema, discovery_failure) = discover_schema(source).await;
        let confirmation = auto_confirm(schema, nl_query);
        generate(generator, confirmation, discovery_failure).await
    }
    .instrument(info_span!("Auto-confirmed SQL generation"))
    .await
}

/// Fetch the schema. A failure is not fatal: we carry on with an empty schema and say why.
async fn discover_schema(source: &dyn SchemaSource) -> (SchemaModel, Option<String>) {
    match source.fetch_schema().await {
        Ok(schema) => (schema, None),
        Err(error) => {
            tracing::warn!(%error, "Unable to discover the schema; continuing with an empty one");
            (SchemaModel::empty(), Some(error.to_string()))
        }
    }
}

async fn generate(
    generator: &dyn Generator,
    confirmation: ConfirmationOutcome,
    discovery_failure: Option<String>,
) -> GenerationOutcome {
    let status = match confirmation.state {
        ConfirmationState::Confirmed => GenerationStatus::Confirmed,
        _ => GenerationStatus::FallbackConfirmed,
    };

    let sql_queries = generate_sql(generator, confirmation.generation_prompt).await;
    tracing::info!(
        candidates = sql_queries.len(),
        status = ?status,
        "Generated SQL"
    );

    GenerationOutcome {
        status,
        sql_queries,
        confirmed_schema: confirmation.schema,
        nl_query: confirmation.nl_query,
        discovery_failure,
    }
}
