//! Tests for the question-to-SQL pipeline.

use similar_asserts::assert_eq;

use nl2sql::generator::is_error_candidate;
use nl2sql::pipeline::{
    generate_sql_with_auto_confirm, interactive_sql_generation, GenerationStatus,
};
use nl2sql_configuration::ConfirmationSettings;
use query_engine_metadata::metadata::SchemaModel;
use tests_common::doubles::{
    FailingGenerator, FailingSchemaSource, StaticGenerator, StaticSchemaSource,
};
use tests_common::schemas;

const QUESTION: &str = "How many customers subscribed in 2022?";
const ANSWER: &str =
    "```sql\nSELECT COUNT(*) FROM customers WHERE subscription_date >= '2022-01-01';\n```";

/// Replays the given responses in order, then falls silent.
fn scripted(responses: &[&'static str]) -> impl FnMut(&str) -> String {
    let mut remaining = responses.iter().rev().copied().collect::<Vec<_>>();
    move |_: &str| remaining.pop().unwrap_or_default().to_string()
}

#[tokio::test]
async fn confirmed_schema_is_used_for_generation() {
    tests_common::init_logging();
    let source = StaticSchemaSource(schemas::customers());
    let generator = StaticGenerator::new(ANSWER);
    let mut provider = scripted(&["CONFIRMED"]);

    let outcome = interactive_sql_generation(
        QUESTION,
        &source,
        &generator,
        &mut provider,
        &ConfirmationSettings::default(),
    )
    .await;

    assert_eq!(outcome.status, GenerationStatus::Confirmed);
    assert!(outcome.is_confirmed());
    assert_eq!(outcome.nl_query, QUESTION);
    assert_eq!(outcome.confirmed_schema, schemas::customers());
    assert_eq!(outcome.discovery_failure, None);
    assert_eq!(
        outcome.first_query(),
        Some("SELECT COUNT(*) FROM customers WHERE subscription_date >= '2022-01-01';")
    );

    let prompt = generator.calls().pop().unwrap();
    assert!(prompt
        .last()
        .unwrap()
        .content
        .contains("Columns: index, customer_alphanum_id, first_name"));
}

#[tokio::test]
async fn corrections_reach_the_model() {
    let source = StaticSchemaSource(schemas::customers());
    let generator = StaticGenerator::new(ANSWER);
    let mut provider = scripted(&[
        "Table customers doesn't exist, use clients instead",
        "CONFIRMED",
    ]);

    let outcome = interactive_sql_generation(
        QUESTION,
        &source,
        &generator,
        &mut provider,
        &ConfirmationSettings::default(),
    )
    .await;

    assert_eq!(outcome.status, GenerationStatus::Confirmed);
    assert!(outcome.confirmed_schema.columns("clients").is_some());
    let prompt = generator.calls().pop().unwrap();
    assert!(prompt.last().unwrap().content.contains("Table: clients"));
}

#[tokio::test]
async fn running_out_of_attempts_still_generates() {
    let source = StaticSchemaSource(schemas::customers());
    let generator = StaticGenerator::new(ANSWER);
    let mut provider = scripted(&["what?", "column email doesn't exist, use email_address"]);

    let outcome = interactive_sql_generation(
        QUESTION,
        &source,
        &generator,
        &mut provider,
        &ConfirmationSettings { max_attempts: 2 },
    )
    .await;

    assert_eq!(outcome.status, GenerationStatus::FallbackConfirmed);
    assert!(!outcome.is_confirmed());
    assert!(outcome
        .confirmed_schema
        .columns("customers")
        .unwrap()
        .iter()
        .any(|column| column.name == "email_address"));
    assert_eq!(outcome.sql_queries.len(), 1);
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test]
async fn auto_confirm_uses_the_discovered_schema() {
    let source = StaticSchemaSource(schemas::customers());
    let generator = StaticGenerator::new(ANSWER);

    let outcome = generate_sql_with_auto_confirm(QUESTION, &source, &generator).await;

    assert_eq!(outcome.status, GenerationStatus::Confirmed);
    assert_eq!(outcome.confirmed_schema, schemas::customers());
    assert_eq!(outcome.sql_queries.len(), 1);
}

#[tokio::test]
async fn discovery_failure_continues_with_an_empty_schema() {
    let generator = StaticGenerator::new(ANSWER);

    let outcome = generate_sql_with_auto_confirm(QUESTION, &FailingSchemaSource, &generator).await;

    assert_eq!(outcome.confirmed_schema, SchemaModel::empty());
    assert!(outcome
        .discovery_failure
        .as_deref()
        .unwrap()
        .contains("connection refused"));
    let prompt = generator.calls().pop().unwrap();
    assert!(prompt
        .last()
        .unwrap()
        .content
        .contains("No schema information available."));
}

#[tokio::test]
async fn generator_failure_is_reported_as_a_candidate() {
    let source = StaticSchemaSource(schemas::customers());

    let outcome = generate_sql_with_auto_confirm(QUESTION, &source, &FailingGenerator).await;

    assert_eq!(outcome.status, GenerationStatus::Confirmed);
    assert_eq!(outcome.sql_queries.len(), 1);
    assert!(is_error_candidate(outcome.first_query().unwrap()));
}

#[tokio::test]
async fn the_provider_answers_on_the_calling_thread() {
    let source = StaticSchemaSource(schemas::customers());
    let generator = StaticGenerator::new(ANSWER);
    let caller = std::thread::current().id();
    let mut answered_on = vec![];
    let mut provider = |_: &str| {
        answered_on.push(std::thread::current().id());
        "CONFIRMED".to_string()
    };

    let outcome = interactive_sql_generation(
        QUESTION,
        &source,
        &generator,
        &mut provider,
        &ConfirmationSettings::default(),
    )
    .await;

    assert!(outcome.is_confirmed());
    assert_eq!(answered_on, vec![caller]);
}
