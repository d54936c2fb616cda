//! Evaluation test cases: a question, the SQL that answers it, and optionally the answer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use query_engine_metadata::metadata::{ResultSet, Scalar};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub nl_query: String,
    pub expected_sql: String,
    /// Recorded rows, used when the expected SQL cannot be executed.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<Vec<Vec<Scalar>>>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result_columns: Option<Vec<String>>,
}

impl TestCase {
    /// The recorded answer, if the case has one.
    pub fn recorded_result(&self) -> Option<ResultSet> {
        self.expected_result.as_ref().map(|rows| ResultSet {
            columns: self.expected_result_columns.clone(),
            rows: rows.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum TestCaseError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a JSON array of test cases.
pub async fn load_test_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>, TestCaseError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TestCaseError::Io {
            path: path.to_owned(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| TestCaseError::Parse {
        path: path.to_owned(),
        source,
    })
}
