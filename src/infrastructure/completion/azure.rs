//! Azure-style chat deployment provider
//!
//! One POST per completion against
//! `{base-url}/deployments/{model}/chat/completions/?api-version={version}`,
//! authenticated with an `api-key` header. The reply is the first choice's
//! message content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::{CompletionError, ConfigError};
use crate::domain::traits::Completion;
use crate::infrastructure::config::CompletionConfig;

#[derive(Debug)]
pub struct AzureChatProvider {
    base_url: String,
    model: String,
    api_version: String,
    access_token: String,
    client: Client,
}

impl AzureChatProvider {
    /// Missing credentials are fatal here, at bootstrap, not at request time.
    pub fn new(config: &CompletionConfig) -> Result<Self, ConfigError> {
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| ConfigError::MissingField("completion.access-token".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_version: config.api_version.clone(),
            access_token,
            client,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/deployments/{}/chat/completions/?api-version={}",
            self.base_url, self.model, self.api_version
        )
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

#[async_trait]
impl Completion for AzureChatProvider {
    fn name(&self) -> &str {
        "azure-chat"
    }

    async fn complete(&self, text: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
        };

        let response = self
            .client
            .post(self.request_url())
            .header("api-key", &self.access_token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            // Error bodies usually carry {"error": {"message": ...}}; fall
            // back to the raw body when they don't.
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
                .unwrap_or(body);
            return Err(CompletionError::Api { status, detail });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Parse("No choices in response".to_string()))?;

        Ok(choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> CompletionConfig {
        CompletionConfig {
            base_url: "https://example.org/openai/".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_version: "2024-05-01-preview".to_string(),
            access_token: token.map(|s| s.to_string()),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn missing_access_token_is_a_config_error() {
        let err = AzureChatProvider::new(&config(None)).expect_err("must fail");
        assert!(matches!(err, ConfigError::MissingField(field) if field.contains("access-token")));
    }

    #[test]
    fn request_url_includes_deployment_and_api_version() {
        let provider = AzureChatProvider::new(&config(Some("t"))).expect("provider");
        assert_eq!(
            provider.request_url(),
            "https://example.org/openai/deployments/gpt-4o-mini/chat/completions/?api-version=2024-05-01-preview"
        );
    }

    #[test]
    fn request_body_carries_the_text_verbatim() {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "  spaced   text  ".to_string(),
            }],
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "messages": [{"role": "user", "content": "  spaced   text  "}]
            })
        );
    }

    #[test]
    fn response_parses_first_choice_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "hi there"}}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).expect("parses");
        assert_eq!(chat.choices[0].message.content, "hi there");
    }
}
