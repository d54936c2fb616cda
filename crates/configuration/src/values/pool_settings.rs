use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the Postgres connection pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolSettings {
    /// Maximum number of open connections.
    #[serde(default = "max_connection_default")]
    pub max_connections: u32,
    /// Seconds to wait for a connection before giving up.
    #[serde(default = "acquire_timeout_default")]
    pub acquire_timeout: u64,
}

impl PoolSettings {
    pub fn is_default(&self) -> bool {
        self == &PoolSettings::default()
    }
}

impl Default for PoolSettings {
    fn default() -> PoolSettings {
        PoolSettings {
            max_connections: max_connection_default(),
            acquire_timeout: acquire_timeout_default(),
        }
    }
}

fn max_connection_default() -> u32 {
    5
}

fn acquire_timeout_default() -> u64 {
    30
}
