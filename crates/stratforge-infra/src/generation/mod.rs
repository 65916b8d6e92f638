//! Concrete `TextGenerator` backends.

pub mod anthropic;
pub mod mock;
pub mod openai_compat;

pub use anthropic::AnthropicGenerator;
pub use mock::MockGenerator;
pub use openai_compat::OpenAiCompatGenerator;

use stratforge_core::generation::provider::TextGenerator;
use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};

/// Dispatch wrapper over the concrete backends.
///
/// `TextGenerator` uses RPITIT and is not object-safe, so call sites that
/// pick a backend at runtime (the API handlers, the CLI wizard) go through
/// this enum instead of a trait object.
pub enum AnyGenerator {
    OpenAiCompat(OpenAiCompatGenerator),
    Anthropic(AnthropicGenerator),
    Mock(MockGenerator),
}

impl TextGenerator for AnyGenerator {
    fn name(&self) -> &str {
        match self {
            AnyGenerator::OpenAiCompat(g) => g.name(),
            AnyGenerator::Anthropic(g) => g.name(),
            AnyGenerator::Mock(g) => g.name(),
        }
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        match self {
            AnyGenerator::OpenAiCompat(g) => g.generate(request).await,
            AnyGenerator::Anthropic(g) => g.generate(request).await,
            AnyGenerator::Mock(g) => g.generate(request).await,
        }
    }
}
