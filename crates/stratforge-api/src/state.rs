//! Application state shared by the CLI and the REST API.
//!
//! Holds the in-memory session map, the loaded configuration, and the
//! backend factory. Sessions are never persisted: the product keeps wizard
//! state for the life of the session only, and a restart starts clean.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use secrecy::SecretString;
use uuid::Uuid;

use stratforge_core::generation::service::StrategyGenerator;
use stratforge_infra::config::{self, GlobalConfig};
use stratforge_infra::generation::{
    AnthropicGenerator, AnyGenerator, MockGenerator, OpenAiCompatGenerator,
};
use stratforge_types::wizard::{ModelTarget, WizardState};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live wizard sessions, keyed by session id.
    pub sessions: Arc<DashMap<Uuid, WizardState>>,
    /// Session ids with a generation call currently pending. Guards against
    /// duplicate in-flight requests across concurrent API calls.
    pub generating: Arc<DashMap<Uuid, ()>>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    /// Force the offline mock backend regardless of available keys.
    pub offline: bool,
}

impl AppState {
    /// Load configuration and build the state.
    pub async fn init(offline: bool) -> anyhow::Result<Self> {
        let data_dir = config::resolve_data_dir();
        let config = config::load_global_config(&data_dir).await;

        Ok(Self {
            sessions: Arc::new(DashMap::new()),
            generating: Arc::new(DashMap::new()),
            config,
            data_dir,
            offline,
        })
    }

    /// Build a generation service for the given target.
    ///
    /// Backend selection: `claude` goes to the Anthropic API, `gpt` and
    /// unknown targets to the OpenAI-compatible endpoint, `gemini` to
    /// Google's OpenAI-compatible endpoint. When the matching API key is
    /// missing from the environment (or `offline` is set) the fixed-delay
    /// mock backend is used instead.
    pub fn create_generator(
        &self,
        target: &ModelTarget,
    ) -> anyhow::Result<StrategyGenerator<AnyGenerator>> {
        let model = config::resolve_model(&self.config, target);
        let backend = if self.offline {
            self.mock_backend()
        } else {
            match target {
                ModelTarget::Claude => match std::env::var("ANTHROPIC_API_KEY") {
                    Ok(key) => AnyGenerator::Anthropic(AnthropicGenerator::new(
                        SecretString::from(key),
                    )?),
                    Err(_) => self.fallback_to_mock("ANTHROPIC_API_KEY"),
                },
                ModelTarget::Gemini => match std::env::var("GEMINI_API_KEY") {
                    Ok(key) => AnyGenerator::OpenAiCompat(OpenAiCompatGenerator::gemini(&key)),
                    Err(_) => self.fallback_to_mock("GEMINI_API_KEY"),
                },
                ModelTarget::Gpt | ModelTarget::Other(_) => {
                    match std::env::var("OPENAI_API_KEY") {
                        Ok(key) => {
                            AnyGenerator::OpenAiCompat(OpenAiCompatGenerator::openai(&key))
                        }
                        Err(_) => self.fallback_to_mock("OPENAI_API_KEY"),
                    }
                }
            }
        };

        Ok(StrategyGenerator::new(
            backend,
            model,
            config::resolve_max_tokens(&self.config),
            self.config.temperature,
        ))
    }

    fn mock_backend(&self) -> AnyGenerator {
        AnyGenerator::Mock(MockGenerator::new(std::time::Duration::from_millis(
            self.config.mock_delay_ms,
        )))
    }

    fn fallback_to_mock(&self, missing_key: &str) -> AnyGenerator {
        tracing::warn!(
            missing_key,
            "API key not set; falling back to the offline mock backend"
        );
        self.mock_backend()
    }
}
