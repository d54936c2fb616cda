//! The configuration used at runtime.

use url::Url;

use crate::values::PoolSettings;
use crate::version1::ConfirmationSettings;

/// The 'Configuration' type collects all the information necessary to answer and score
/// questions at runtime: every secret has been read and every value checked.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration'. Keeping the two apart means the rest of the code never deals
/// with configuration format evolution or with where a secret came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub connection_uri: String,
    pub schema_name: String,
    pub pool_settings: PoolSettings,
    pub model: ModelConfiguration,
    pub confirmation_settings: ConfirmationSettings,
}

/// Everything needed to call the chat-completions API.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfiguration {
    pub model: String,
    pub api_key: String,
    pub api_url: Url,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stop: Vec<String>,
}
