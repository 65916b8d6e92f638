//! TextGenerator trait definition.
//!
//! The abstraction every text-generation backend implements. The product
//! treats the backend as an opaque asynchronous function from a prompt
//! string to a document string, so the trait is a single completion call --
//! no streaming, no token accounting.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in `stratforge-infra` (e.g. `OpenAiCompatGenerator`,
//! `MockGenerator`).

use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};

/// Trait for text-generation backends.
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "openai", "anthropic", "mock").
    fn name(&self) -> &str;

    /// Submit one completion request and await the full document.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationResponse, GenerationError>> + Send;
}
