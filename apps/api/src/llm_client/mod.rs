//! Completion client — the single point of entry for all LLM calls.
//!
//! ARCHITECTURAL RULE: no other module may call the completion API directly.
//! All LLM interactions MUST go through this module.
//!
//! One request per review: a two-message sequence (system, user) at a fixed
//! low temperature, optionally in JSON-object mode. No retry, no backoff,
//! no timeout beyond the transport default — failures surface verbatim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Fast, cheap model for quick checks.
pub const MODEL_FAST: &str = "gpt-4o-mini";
/// Larger model for higher-quality reviews.
pub const MODEL_CAPABLE: &str = "gpt-4o";

/// Fixed low temperature biases toward deterministic, instruction-following
/// output. Intentionally not configurable.
const TEMPERATURE: f64 = 0.2;

#[cfg(feature = "openai")]
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Which backing completion model to invoke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    #[default]
    Fast,
    Capable,
}

impl ModelChoice {
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelChoice::Fast => MODEL_FAST,
            ModelChoice::Capable => MODEL_CAPABLE,
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API credential configured")]
    CredentialMissing,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion returned no content")]
    EmptyContent,
}

/// The completion capability. Carried in `AppState` as an
/// `Option<Arc<dyn CompletionBackend>>` so a build without a backend
/// reports CLIENT_UNAVAILABLE instead of failing to compile callers.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one system+user message pair and returns the raw text of the
    /// top response choice.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        model: ModelChoice,
        json_mode: bool,
    ) -> Result<String, LlmError>;
}

/// Returns the completion backend this build provides, if any.
pub fn default_backend(api_key: Option<String>) -> Option<Arc<dyn CompletionBackend>> {
    #[cfg(feature = "openai")]
    {
        Some(Arc::new(OpenAiClient::new(api_key)))
    }
    #[cfg(not(feature = "openai"))]
    {
        let _ = api_key;
        None
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

fn build_request<'a>(
    system: &'a str,
    user: &'a str,
    model: ModelChoice,
    json_mode: bool,
) -> ChatRequest<'a> {
    ChatRequest {
        model: model.model_id(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        temperature: TEMPERATURE,
        response_format: json_mode.then_some(ResponseFormat {
            format_type: "json_object",
        }),
    }
}

/// OpenAI chat-completions backend.
#[cfg(feature = "openai")]
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

#[cfg(feature = "openai")]
impl OpenAiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[cfg(feature = "openai")]
#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        model: ModelChoice,
        json_mode: bool,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::CredentialMissing)?;

        let request_body = build_request(system, user, model, json_mode);

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured error message when the body carries one
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        tracing::debug!("completion call succeeded (model: {})", model.model_id());

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_choice_serde_round_trip() {
        assert_eq!(
            serde_json::from_str::<ModelChoice>(r#""fast""#).unwrap(),
            ModelChoice::Fast
        );
        assert_eq!(
            serde_json::from_str::<ModelChoice>(r#""capable""#).unwrap(),
            ModelChoice::Capable
        );
        assert_eq!(serde_json::to_string(&ModelChoice::Fast).unwrap(), r#""fast""#);
    }

    #[test]
    fn test_model_choice_ids() {
        assert_eq!(ModelChoice::Fast.model_id(), MODEL_FAST);
        assert_eq!(ModelChoice::Capable.model_id(), MODEL_CAPABLE);
    }

    #[test]
    fn test_model_choice_defaults_to_fast() {
        assert_eq!(ModelChoice::default(), ModelChoice::Fast);
    }

    #[test]
    fn test_request_carries_low_temperature_and_json_mode() {
        let request = build_request("sys", "usr", ModelChoice::Fast, true);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["temperature"], json!(0.2));
        assert_eq!(body["response_format"]["type"], json!("json_object"));
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][1]["role"], json!("user"));
        assert_eq!(body["messages"][1]["content"], json!("usr"));
    }

    #[test]
    fn test_request_omits_response_format_without_json_mode() {
        let request = build_request("sys", "usr", ModelChoice::Capable, false);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], json!("gpt-4o"));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_chat_response_top_choice_content() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "{\"ok\": true}"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_openai_error_body_parses() {
        let json = r#"{"error": {"message": "Rate limit reached", "type": "rate_limit_error"}}"#;
        let parsed: OpenAiError = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.message, "Rate limit reached");
    }
}
