//! Generation request/response shapes.
//!
//! The external text-generation service is consumed as an opaque call that
//! takes a compiled prompt and returns a document. No streaming: the product
//! displays the finished artifact, so a single request/response pair is the
//! whole interface.

use serde::{Deserialize, Serialize};

/// Request to a text-generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Provider-side model identifier, e.g. "gpt-4o" or
    /// "claude-sonnet-4-20250514".
    pub model: String,
    /// The compiled prompt, submitted verbatim.
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from a text-generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Provider-assigned response id (empty when the provider has none).
    pub id: String,
    /// The generated strategy document. Displayed/copied, never parsed.
    pub content: String,
    /// Model that actually served the request.
    pub model: String,
}
