use std::time::Duration;

use edict_core::{EdictError, LlmConfig};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use edict_mining::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage::user("Analyze this comment");
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use edict_mining::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint:
/// OpenAI, Ollama, vLLM, LiteLLM, etc. Extraction calls use temperature 0.1
/// and request a JSON object response.
///
/// # Examples
///
/// ```
/// use edict_core::LlmConfig;
/// use edict_mining::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config).unwrap();
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::Llm`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_core::LlmConfig;
    /// use edict_mining::llm::LlmClient;
    ///
    /// let client = LlmClient::new(&LlmConfig::default()).unwrap();
    /// ```
    pub fn new(config: &LlmConfig) -> Result<Self, EdictError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EdictError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        format!("{base_url}/v1/chat/completions")
    }

    /// Send a chat completion request and return the text response.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::Llm`] on HTTP errors, non-success status codes,
    /// or a response body missing the expected completion text.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, EdictError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": 0.1,
            "response_format": { "type": "json_object" },
        });

        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| EdictError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(EdictError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EdictError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                EdictError::Llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edict_core::LlmConfig;

    #[test]
    fn client_construction_succeeds() {
        let client = LlmClient::new(&LlmConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn model_returns_config_model() {
        let config = LlmConfig {
            model: "gemini-pro".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.model(), "gemini-pro");
    }

    #[test]
    fn endpoint_honors_custom_base_url() {
        let config = LlmConfig {
            base_url: Some("http://localhost:11434".into()),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage::system("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hello");
    }
}
