//! Settings for the chat-completions model that writes the SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::values::{ApiKey, Secret};

pub const DEFAULT_API_KEY_VARIABLE: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Which model to ask, and how.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// The model identifier, as the API knows it.
    #[serde(default = "model_default")]
    pub model: String,
    #[serde(default = "api_key_default")]
    pub api_key: ApiKey,
    /// The chat-completions endpoint.
    #[serde(default = "api_url_default")]
    pub api_url: String,
    #[serde(default = "max_tokens_default")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f64,
    /// Sequences at which the model should stop writing.
    #[serde(default = "stop_default")]
    pub stop: Vec<String>,
}

impl GenerationSettings {
    pub fn empty() -> Self {
        Self {
            model: model_default(),
            api_key: api_key_default(),
            api_url: api_url_default(),
            max_tokens: max_tokens_default(),
            temperature: 0.0,
            stop: stop_default(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::empty()
    }
}

fn model_default() -> String {
    DEFAULT_MODEL.to_string()
}

fn api_key_default() -> ApiKey {
    ApiKey(Secret::from_environment(DEFAULT_API_KEY_VARIABLE))
}

fn api_url_default() -> String {
    DEFAULT_API_URL.to_string()
}

fn max_tokens_default() -> u32 {
    500
}

fn stop_default() -> Vec<String> {
    vec!["<|endoftext|>".to_string(), "<|eot_id|>".to_string()]
}
