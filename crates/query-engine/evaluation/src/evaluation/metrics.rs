//! The two per-case scores.

use query_engine_metadata::metadata::ResultSet;
use query_engine_sql::sql::normalize::normalize_sql;

use super::comparison::compare_result_sets;

/// 1.0 when both statements read the same once normalised, 0.0 otherwise.
pub fn exact_match(generated: &str, expected: &str) -> f64 {
    if normalize_sql(generated) == normalize_sql(expected) {
        1.0
    } else {
        0.0
    }
}

/// 1.0 when both statements produce equivalent rows, 0.0 otherwise.
///
/// `None` means the statement failed to execute. Two failures count as agreement.
pub fn execution_accuracy(generated: Option<&ResultSet>, expected: Option<&ResultSet>) -> f64 {
    let (generated, expected) = match (generated, expected) {
        (None, None) => return 1.0,
        (Some(generated), Some(expected)) => (generated, expected),
        (None, Some(_)) => {
            tracing::debug!("The generated statement failed to execute");
            return 0.0;
        }
        (Some(_), None) => {
            tracing::debug!("The expected statement failed to execute");
            return 0.0;
        }
    };

    match (generated.is_empty(), expected.is_empty()) {
        (true, true) => return 1.0,
        (false, false) => {}
        _ => {
            tracing::debug!(
                generated_rows = generated.len(),
                expected_rows = expected.len(),
                "One result set is empty and the other is not"
            );
            return 0.0;
        }
    }

    match compare_result_sets(generated, expected) {
        Ok(true) => 1.0,
        Ok(false) => 0.0,
        Err(error) => {
            tracing::warn!(%error, "Unable to compare result sets");
            0.0
        }
    }
}
