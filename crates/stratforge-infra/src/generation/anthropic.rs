//! Anthropic Messages API text-generation backend.
//!
//! Non-streaming POST to `/v1/messages` with the required auth headers.
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when constructing request headers; the struct deliberately does not
//! derive Debug.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use stratforge_core::generation::provider::TextGenerator;
use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};

/// Anthropic Claude generation backend.
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

/// Request body for the Anthropic Messages API.
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl AnthropicGenerator {
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| GenerationError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
        })
    }

    /// Override the base URL (useful for proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl TextGenerator for AnthropicGenerator {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
        };

        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => GenerationError::AuthenticationFailed,
                429 => GenerationError::RateLimited {
                    retry_after_ms: None,
                },
                _ => GenerationError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: AnthropicResponse =
            response.json().await.map_err(|e| GenerationError::Provider {
                message: format!("failed to parse response: {e}"),
            })?;

        let content = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(GenerationResponse {
            id: parsed.id,
            content,
            model: parsed.model,
        })
    }
}
