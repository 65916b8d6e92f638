//! OpenAI-compatible text-generation backend.
//!
//! One [`OpenAiCompatGenerator`] serves any provider speaking the OpenAI
//! chat-completions protocol (OpenAI itself, Google Gemini via its
//! OpenAI-compatible beta endpoint) through configurable base URLs.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};

use stratforge_core::generation::provider::TextGenerator;
use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};

/// Generator for any OpenAI-compatible API.
///
/// Does NOT derive Debug: the API key lives inside the `async_openai`
/// client and must never reach logs.
pub struct OpenAiCompatGenerator {
    client: Client<OpenAIConfig>,
    provider_name: String,
}

impl OpenAiCompatGenerator {
    /// Create a generator from an explicit base URL and key.
    pub fn new(provider_name: &str, base_url: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            provider_name: provider_name.to_string(),
        }
    }

    /// OpenAI at `https://api.openai.com/v1`.
    pub fn openai(api_key: &str) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Google Gemini via the OpenAI-compatible beta endpoint.
    pub fn gemini(api_key: &str) -> Self {
        Self::new(
            "gemini",
            "https://generativelanguage.googleapis.com/v1beta/openai",
            api_key,
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> CreateChatCompletionRequest {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
                name: None,
            },
        )];

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl TextGenerator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(GenerationResponse {
            id: response.id,
            content,
            model: response.model,
        })
    }
}

fn map_openai_error(err: async_openai::error::OpenAIError) -> GenerationError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                GenerationError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                GenerationError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                GenerationError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if reqwest_err.is_timeout() {
                return GenerationError::Timeout;
            }
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => GenerationError::AuthenticationFailed,
                    429 => GenerationError::RateLimited {
                        retry_after_ms: None,
                    },
                    _ => GenerationError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                GenerationError::Provider {
                    message: err.to_string(),
                }
            }
        }
        _ => GenerationError::Provider {
            message: err.to_string(),
        },
    }
}
