//! Two scores per test case: whether the statement text matches once normalised, and whether
//! running it gives the same rows as running the expected statement.

pub mod comparison;
pub mod metrics;
pub mod report;

pub use comparison::{compare_result_sets, ComparisonError};
pub use metrics::{exact_match, execution_accuracy};
pub use report::{EvaluationOutcome, EvaluationReport};
