//! Per-case outcomes and the run summary.

use std::fmt;

use serde::Serialize;

use query_engine_metadata::metadata::ResultSet;

/// Everything we learned about one test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub nl_query: String,
    pub expected_sql: String,
    /// The first candidate statement, or the empty string when none was produced.
    pub generated_sql: String,
    pub exact_match: f64,
    pub execution_accuracy: f64,
    /// `None` when the generated statement failed to execute.
    pub generated_result: Option<ResultSet>,
    /// `None` when no expected rows could be obtained.
    pub expected_result: Option<ResultSet>,
}

/// The case as printed during a run: the statements, both answers, and the scores.
impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "NL Query: {}", self.nl_query)?;
        writeln!(f, "Expected SQL:\n{}", self.expected_sql)?;
        writeln!(f, "Generated SQL:\n{}", self.generated_sql)?;

        writeln!(f, "\n--- Generated SQL Query Answer ---")?;
        match &self.generated_result {
            Some(result) => writeln!(f, "{result}")?,
            None => writeln!(f, "Failed to execute generated SQL or no results.")?,
        }

        writeln!(f, "\n--- Correct SQL Query Answer ---")?;
        match &self.expected_result {
            Some(result) => writeln!(f, "{result}")?,
            None => writeln!(f, "Expected SQL result data not available.")?,
        }

        writeln!(f, "\nExact Match Accuracy: {:.2}", self.exact_match)?;
        write!(f, "Execution Accuracy: {:.2}", self.execution_accuracy)
    }
}

/// The outcomes of a run and their averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub mean_exact_match: f64,
    pub mean_execution_accuracy: f64,
    pub outcomes: Vec<EvaluationOutcome>,
}

impl EvaluationReport {
    /// Average the outcomes. A run with no cases averages to zero.
    pub fn from_outcomes(outcomes: Vec<EvaluationOutcome>) -> Self {
        let total = outcomes.len();
        let mean = |score: fn(&EvaluationOutcome) -> f64| {
            if total == 0 {
                0.0
            } else {
                #[allow(clippy::cast_precision_loss)]
                let count = total as f64;
                outcomes.iter().map(score).sum::<f64>() / count
            }
        };

        EvaluationReport {
            total,
            mean_exact_match: mean(|outcome| outcome.exact_match),
            mean_execution_accuracy: mean(|outcome| outcome.execution_accuracy),
            outcomes,
        }
    }
}

/// The summary block printed at the end of a run.
impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "--- Evaluation Summary ---")?;
        writeln!(f, "Total Test Cases: {}", self.total)?;
        writeln!(
            f,
            "Average Exact Match Accuracy: {:.2}%",
            self.mean_exact_match * 100.0
        )?;
        writeln!(
            f,
            "Average Execution Accuracy: {:.2}%",
            self.mean_execution_accuracy * 100.0
        )?;
        write!(f, "--------------------------")
    }
}
