#[cfg(test)]
pub mod fake;
pub mod models;
pub mod retry;
pub mod transport;

pub use models::Provider;
pub use transport::{HttpTransport, Transport};

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Provider { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Missing credential or unknown model; raised before any request is made.
    #[error("{0}")]
    Configuration(String),

    #[error("Failed to generate description: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to generate description: unexpected {provider} response ({reason})")]
    MalformedResponse { provider: Provider, reason: String },
}

/// One prompt bound to the active provider selection. Built per attempt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub provider: Provider,
    pub model_id: String,
    pub credential: String,
}

impl GenerationRequest {
    pub fn new(prompt: String, config: &ProviderConfig) -> Self {
        Self {
            prompt,
            provider: config.provider,
            model_id: config.model_id.clone(),
            credential: config.credential.clone(),
        }
    }
}

/// Sends prompts through a `Transport` with retry/backoff and extracts the
/// description text from either provider's response shape.
pub struct GenerationClient {
    transport: Arc<dyn Transport>,
    base_delay: Duration,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn Transport>, base_delay: Duration) -> Self {
        Self {
            transport,
            base_delay,
        }
    }

    #[instrument(skip_all, fields(provider = %request.provider, model = %request.model_id))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        validate(request)?;

        let response =
            retry::with_backoff(self.base_delay, || self.transport.send(request)).await?;
        let text = extract_text(request.provider, &response)?;
        debug!(chars = text.len(), "received description");
        Ok(text)
    }
}

fn validate(request: &GenerationRequest) -> Result<(), GenerationError> {
    let provider = request.provider;
    if request.credential.trim().is_empty() {
        return Err(GenerationError::Configuration(format!(
            "{provider} API key not found. Set {} or add api_key under [ai.{}] in .pr-describer.toml.",
            provider.key_env_var(),
            config_section(provider),
        )));
    }
    if !models::is_known(provider, &request.model_id) {
        return Err(GenerationError::Configuration(format!(
            "Invalid {provider} model '{}'. Available models: {}",
            request.model_id,
            models::available_ids(provider),
        )));
    }
    Ok(())
}

fn config_section(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "openai",
        Provider::Anthropic => "anthropic",
    }
}

/// Anthropic: `content[0].text`. OpenAI: `choices[0].message.content`.
fn extract_text(provider: Provider, response: &Value) -> Result<String, GenerationError> {
    let text = match provider {
        Provider::Anthropic => response["content"][0]["text"].as_str(),
        Provider::OpenAi => response["choices"][0]["message"]["content"].as_str(),
    };
    text.map(str::to_string)
        .ok_or_else(|| GenerationError::MalformedResponse {
            provider,
            reason: "missing text content".to_string(),
        })
}
