use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::models::Provider;
use super::{GenerationRequest, TransportError};

pub const ANTHROPIC_API: &str = "https://api.anthropic.com";
pub const OPENAI_API: &str = "https://api.openai.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant specialized in writing clear and comprehensive GitHub pull request descriptions.";
const ANTHROPIC_MAX_TOKENS: u32 = 4000;
const OPENAI_MAX_TOKENS: u32 = 1000;
const OPENAI_TEMPERATURE: f64 = 0.7;

/// Delivers a generation request to its provider and hands back the raw JSON
/// response. Whether this happens in-process or through a relay is up to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GenerationRequest) -> Result<Value, TransportError>;
}

/// Direct HTTPS calls to the provider APIs.
pub struct HttpTransport {
    client: reqwest::Client,
    anthropic_base: String,
    openai_base: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            anthropic_base: ANTHROPIC_API.to_string(),
            openai_base: OPENAI_API.to_string(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn anthropic_body(request: &GenerationRequest) -> Value {
    json!({
        "model": request.model_id,
        "max_tokens": ANTHROPIC_MAX_TOKENS,
        "messages": [{ "role": "user", "content": request.prompt }],
        "system": SYSTEM_INSTRUCTION,
    })
}

pub fn openai_body(request: &GenerationRequest) -> Value {
    json!({
        "model": request.model_id,
        "messages": [{ "role": "user", "content": request.prompt }],
        "temperature": OPENAI_TEMPERATURE,
        "max_tokens": OPENAI_MAX_TOKENS,
    })
}

/// Pull `error.message` out of a failed response body, or a generic fallback.
pub fn error_message(provider: Provider, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| match provider {
            Provider::Anthropic => "Claude API request failed".to_string(),
            Provider::OpenAi => "OpenAI API request failed".to_string(),
        })
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(provider = %request.provider, model = %request.model_id))]
    async fn send(&self, request: &GenerationRequest) -> Result<Value, TransportError> {
        let builder = match request.provider {
            Provider::Anthropic => self
                .client
                .post(format!("{}/v1/messages", self.anthropic_base))
                .header("x-api-key", &request.credential)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_body(request)),
            Provider::OpenAi => self
                .client
                .post(format!("{}/v1/chat/completions", self.openai_base))
                .bearer_auth(&request.credential)
                .json(&openai_body(request)),
        };

        debug!(prompt_bytes = request.prompt.len(), "sending generation request");
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Provider {
                status: status.as_u16(),
                message: error_message(request.provider, &text),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(provider: Provider, model: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: "Describe this".to_string(),
            provider,
            model_id: model.to_string(),
            credential: "key".to_string(),
        }
    }

    #[test]
    fn test_anthropic_body_shape() {
        let body = anthropic_body(&request(Provider::Anthropic, "claude-3-5-haiku-latest"));
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Describe this");
        assert_eq!(body["system"], SYSTEM_INSTRUCTION);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_openai_body_shape() {
        let body = openai_body(&request(Provider::OpenAi, "gpt-4"));
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_error_message_from_provider_body() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "Incorrect API key provided"}}"#;
        assert_eq!(
            error_message(Provider::OpenAi, body),
            "Incorrect API key provided"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(Provider::Anthropic, "<html>502</html>"),
            "Claude API request failed"
        );
        assert_eq!(
            error_message(Provider::OpenAi, r#"{"error": {}}"#),
            "OpenAI API request failed"
        );
    }
}
