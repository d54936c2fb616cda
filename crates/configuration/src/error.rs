//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::environment::Variable;

#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported configuration version {found}; expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to serialize the configuration: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("missing environment variable when processing {setting}: {variable}")]
    MissingEnvironmentVariable {
        setting: &'static str,
        variable: Variable,
    },
    #[error("invalid value for {setting}: {message}")]
    InvalidValue {
        setting: &'static str,
        message: String,
    },
}
