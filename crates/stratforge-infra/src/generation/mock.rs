//! Fixed-delay mock generation backend.
//!
//! For offline use, demos, and tests: sleeps for the configured duration
//! and returns a skeleton strategy that echoes the submitted prompt's size
//! so callers can tell distinct compilations apart.

use std::time::Duration;

use stratforge_core::generation::provider::TextGenerator;
use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};

/// Offline generator with simulated latency.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    delay: Duration,
}

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No artificial latency; used by tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let content = format!(
            "# Generated Strategy (offline mock)\n\n\
             Model: {}\n\
             Prompt size: {} bytes\n\n\
             ## Overview\n\
             This is a placeholder strategy document produced without \
             contacting a provider. Configure an API key to generate a real \
             one.\n\n\
             ## Entry Conditions\n\
             - Derived from your configured template and parameters.\n\n\
             ## Exit Conditions\n\
             - Derived from your stop-loss / take-profit settings.\n\n\
             ## Risk Controls\n\
             - Derived from your risk-management stage.",
            request.model,
            request.prompt.len()
        );

        Ok(GenerationResponse {
            id: format!("mock-{}", request.prompt.len()),
            content,
            model: request.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_echoes_prompt_size_and_model() {
        let generator = MockGenerator::instant();
        let request = GenerationRequest {
            model: "test-model".to_string(),
            prompt: "0123456789".to_string(),
            max_tokens: 1024,
            temperature: None,
        };

        let response = generator.generate(&request).await.unwrap();
        assert_eq!(response.id, "mock-10");
        assert_eq!(response.model, "test-model");
        assert!(response.content.contains("Prompt size: 10 bytes"));
    }

    #[tokio::test]
    async fn mock_waits_for_the_configured_delay() {
        let generator = MockGenerator::new(Duration::from_millis(30));
        let request = GenerationRequest {
            model: "m".to_string(),
            prompt: "p".to_string(),
            max_tokens: 16,
            temperature: None,
        };

        let started = std::time::Instant::now();
        generator.generate(&request).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
