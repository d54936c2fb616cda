//! Run a set of test cases through generation and score the results.

use tracing::{info_span, Instrument};

use query_engine_evaluation::evaluation::{
    exact_match, execution_accuracy, EvaluationOutcome, EvaluationReport,
};
use query_engine_execution::{SchemaSource, StatementExecutor};
use query_engine_metadata::metadata::ResultSet;

use crate::generator::{is_error_candidate, Generator};
use crate::pipeline::generate_sql_with_auto_confirm;
use crate::test_cases::TestCase;

/// The collaborators an evaluation run needs.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    pub source: &'a dyn SchemaSource,
    pub generator: &'a dyn Generator,
    pub executor: &'a dyn StatementExecutor,
}

impl Evaluator<'_> {
    /// Score every case. Expected answers are all fetched before any SQL is generated.
    pub async fn run(&self, cases: &[TestCase]) -> EvaluationReport {
        let mut expected = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            expected.push(
                self.expected_result(case)
                    .instrument(info_span!("Fetch expected result", case = index + 1))
                    .await,
            );
        }

        let mut outcomes = Vec::with_capacity(cases.len());
        for (index, (case, expected_result)) in cases.iter().zip(expected).enumerate() {
            let outcome = self
                .evaluate(case, expected_result)
                .instrument(info_span!("Evaluate test case", case = index + 1))
                .await;
            tracing::info!(
                case = index + 1,
                exact_match = outcome.exact_match,
                execution_accuracy = outcome.execution_accuracy,
                "Scored test case"
            );
            outcomes.push(outcome);
        }

        EvaluationReport::from_outcomes(outcomes)
    }

    /// The rows the expected SQL produces, or the recorded rows when it cannot be executed.
    pub async fn expected_result(&self, case: &TestCase) -> Option<ResultSet> {
        match self.executor.execute(case.expected_sql.trim()).await {
            Ok(result) => Some(result),
            Err(error) => {
                let recorded = case.recorded_result();
                tracing::warn!(
                    %error,
                    using_recorded_rows = recorded.is_some(),
                    "The expected SQL failed to execute"
                );
                recorded
            }
        }
    }

    /// Generate SQL for one case and score it against `expected_result`.
    pub async fn evaluate(
        &self,
        case: &TestCase,
        expected_result: Option<ResultSet>,
    ) -> EvaluationOutcome {
        let expected_sql = case.expected_sql.trim();
        let generation =
            generate_sql_with_auto_confirm(&case.nl_query, self.source, self.generator).await;
        let generated_sql = generation.first_query().unwrap_or_default().to_string();

        let generated_result = if is_error_candidate(&generated_sql) {
            tracing::warn!(candidate = %generated_sql, "No SQL was generated");
            None
        } else {
            match self.executor.execute(&generated_sql).await {
                Ok(result) => Some(result),
                Err(error) => {
                    tracing::warn!(%error, "The generated SQL failed to execute");
                    None
                }
            }
        };

        EvaluationOutcome {
            nl_query: case.nl_query.clone(),
            expected_sql: expected_sql.to_string(),
            exact_match: exact_match(&generated_sql, expected_sql),
            execution_accuracy: execution_accuracy(
                generated_result.as_ref(),
                expected_result.as_ref(),
            ),
            generated_sql,
            generated_result,
            expected_result,
        }
    }
}
