use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use offerly_core::config::LlmConfig;
use offerly_core::ConfigError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the external language capability. Always recovered by the
/// caller (rule fallback or fail-open decision) and logged as diagnostics;
/// never shown to the end user.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("api key is not configured")]
    MissingApiKey,
    #[error("capability request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("capability returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("capability returned an empty completion")]
    EmptyCompletion,
    #[error("capability reply contained no JSON object")]
    MissingJson,
    #[error("capability reply could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("capability reply was not usable: {0}")]
    UnexpectedReply(String),
    #[error("capability unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint. One user
/// message in, the first choice's text out; temperature pinned to zero.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
        if api_key.expose_secret().trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

/// Builds the capability client when an API key is configured; `None`
/// otherwise. Construction problems are configuration errors and surface at
/// startup, not at the first conversation turn.
pub fn capability_from_config(
    config: &LlmConfig,
) -> Result<Option<Arc<dyn LlmClient>>, ConfigError> {
    if !config.api_key_present() {
        return Ok(None);
    }

    let client = OpenAiClient::new(config).map_err(|error| {
        ConfigError::Validation(format!("could not build capability client: {error}"))
    })?;
    Ok(Some(Arc::new(client)))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let decoded = response.json::<ChatResponse>().await?;
        decoded
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}

/// Returns the first balanced brace-delimited substring. The capability may
/// wrap its JSON in commentary, so a greedy first-to-last-brace slice is not
/// safe; this scan honors nesting and brace characters inside string
/// literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, character) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match character {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + index + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::extract_json_object;

    #[test]
    fn extracts_object_surrounded_by_commentary() {
        let reply = r#"Sure, here you go: {"max_price": 50} - let me know!"#;
        assert_eq!(extract_json_object(reply), Some(r#"{"max_price": 50}"#));
    }

    #[test]
    fn extracts_first_of_several_objects() {
        let reply = r#"{"a": 1} and also {"b": 2}"#;
        assert_eq!(extract_json_object(reply), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn handles_nested_objects() {
        let reply = r#"result: {"outer": {"inner": 1}, "x": 2} done"#;
        assert_eq!(extract_json_object(reply), Some(r#"{"outer": {"inner": 1}, "x": 2}"#));
    }

    #[test]
    fn ignores_braces_inside_string_literals() {
        let reply = r#"{"question": "adjust {price}?"} trailing"#;
        assert_eq!(extract_json_object(reply), Some(r#"{"question": "adjust {price}?"}"#));
    }

    #[test]
    fn returns_none_without_a_balanced_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(r#"{"unterminated": 1"#), None);
    }
}
