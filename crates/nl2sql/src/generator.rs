//! Asking a language model for SQL.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info_span, Instrument};

use nl2sql_configuration::ModelConfiguration;
use query_engine_sql::sql::extract::extract_sql;
use query_engine_translation::translation::prompt::PromptMessage;

/// The candidate returned when there is nothing to send to the model.
pub const EMPTY_PROMPT_CANDIDATE: &str = "-- Error: Prompt contained no valid input tokens. --";

const ERROR_CANDIDATE_PREFIX: &str = "-- Error";

/// Something that completes a chat prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, GenerationError>;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generator configuration: {0}")]
    Configuration(String),
    #[error("OpenRouter API Error: {status} - {details}")]
    Status { status: u16, details: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// What to send to the model: a chat prompt, or plain text sent as a single user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Messages(Vec<PromptMessage>),
    Text(String),
}

impl Prompt {
    pub fn into_messages(self) -> Vec<PromptMessage> {
        match self {
            Prompt::Messages(messages) => messages,
            Prompt::Text(text) => vec![PromptMessage::user(text.trim())],
        }
    }
}

impl From<Vec<PromptMessage>> for Prompt {
    fn from(messages: Vec<PromptMessage>) -> Self {
        Prompt::Messages(messages)
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

/// Send the prompt and pull the SQL statements out of the answer.
///
/// This never fails: a prompt with nothing in it, or a failed request, gives a single
/// `-- Error` candidate describing what went wrong.
pub async fn generate_sql(generator: &dyn Generator, prompt: impl Into<Prompt>) -> Vec<String> {
    let messages = prompt.into().into_messages();

    if messages
        .iter()
        .all(|message| message.content.trim().is_empty())
    {
        tracing::warn!("The prompt has no content; not calling the model");
        return vec![EMPTY_PROMPT_CANDIDATE.to_string()];
    }

    match generator.complete(&messages).await {
        Ok(response) => {
            tracing::debug!(%response, "Model responded");
            let candidates = extract_sql(&response);
            if candidates.is_empty() {
                tracing::warn!("The model response contained no SQL");
            }
            candidates
        }
        Err(error) => {
            tracing::error!(%error, "Error generating SQL");
            vec![format!("{ERROR_CANDIDATE_PREFIX}: {error} --")]
        }
    }
}

/// Is this candidate an error report rather than SQL?
pub fn is_error_candidate(candidate: &str) -> bool {
    candidate.trim_start().starts_with(ERROR_CANDIDATE_PREFIX)
}

/// The OpenRouter chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterGenerator {
    client: reqwest::Client,
    settings: ModelConfiguration,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    max_tokens: u32,
    temperature: f64,
    stop: &'a [String],
}

impl OpenRouterGenerator {
    pub fn new(settings: ModelConfiguration) -> Result<Self, GenerationError> {
        if settings.api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "the API key is empty".to_string(),
            ));
        }
        if settings.model.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "the model name is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(OpenRouterGenerator { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl Generator for OpenRouterGenerator {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stop: &self.settings.stop,
        };

        async {
            let response = self
                .client
                .post(self.settings.api_url.clone())
                .bearer_auth(&self.settings.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let details = match response.text().await {
                    Ok(body) if !body.is_empty() => body,
                    _ => "No response content".to_string(),
                };
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    details,
                });
            }

            let body: serde_json::Value = response.json().await?;
            Ok::<_, GenerationError>(response_content(&body))
        }
        .instrument(info_span!("Generate SQL", model = %self.settings.model))
        .await
    }
}

/// The first choice's message content, or the whole body when there is no message.
pub fn response_content(body: &serde_json::Value) -> String {
    match body.pointer("/choices/0/message") {
        Some(message) => message
            .get("content")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        None => body.to_string(),
    }
}
