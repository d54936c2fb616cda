use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Secret;

/// The Postgres connection string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ConnectionUri(pub Secret);

impl From<String> for ConnectionUri {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for ConnectionUri {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

/// The key for the chat-completions API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ApiKey(pub Secret);

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
