//! Database connection settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::values::{ConnectionUri, PoolSettings, Secret};

pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "DATABASE_URL";
pub const DEFAULT_SCHEMA_NAME: &str = "public";

/// Database connection settings.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnectionSettings {
    /// Connection string for a Postgres-compatible database.
    #[serde(default = "connection_uri_default")]
    pub connection_uri: ConnectionUri,
    /// The schema whose tables are shown to the model.
    #[serde(default = "schema_name_default")]
    pub schema_name: String,
    #[serde(skip_serializing_if = "PoolSettings::is_default")]
    #[serde(default)]
    pub pool_settings: PoolSettings,
}

impl DatabaseConnectionSettings {
    pub fn empty() -> Self {
        Self {
            connection_uri: connection_uri_default(),
            schema_name: schema_name_default(),
            pool_settings: PoolSettings::default(),
        }
    }
}

impl Default for DatabaseConnectionSettings {
    fn default() -> Self {
        Self::empty()
    }
}

fn connection_uri_default() -> ConnectionUri {
    ConnectionUri(Secret::from_environment(DEFAULT_CONNECTION_URI_VARIABLE))
}

fn schema_name_default() -> String {
    DEFAULT_SCHEMA_NAME.to_string()
}
