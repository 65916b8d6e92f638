//! Global configuration loader for Stratforge.
//!
//! Reads `config.toml` from the data directory (`~/.stratforge/` in
//! production, overridable via `STRATFORGE_DATA_DIR`) and deserializes it
//! into [`GlobalConfig`]. Falls back to sensible defaults when the file is
//! missing or malformed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stratforge_types::wizard::ModelTarget;

/// Safety floor for the per-request output budget.
const MIN_MAX_TOKENS: u32 = 256;

/// Global configuration for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default compiler template variant for new sessions.
    #[serde(default)]
    pub default_target: ModelTarget,

    /// Output token budget for generation requests.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature passed to the provider, when set.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Simulated latency for the mock provider, in milliseconds.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,

    /// Per-target provider model overrides.
    #[serde(default)]
    pub model_overrides: Vec<ModelOverride>,
}

/// Maps a model target to a provider-side model identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOverride {
    pub target: ModelTarget,
    pub model: String,
}

fn default_max_tokens() -> u32 {
    4_096
}

fn default_mock_delay_ms() -> u64 {
    1_500
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_target: ModelTarget::default(),
            max_tokens: default_max_tokens(),
            temperature: None,
            mock_delay_ms: default_mock_delay_ms(),
            model_overrides: Vec::new(),
        }
    }
}

/// Resolve the data directory: `STRATFORGE_DATA_DIR`, else `~/.stratforge`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STRATFORGE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stratforge")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the provider-side model identifier for a target.
///
/// Priority: explicit override from `config.toml`, then the built-in
/// default per target. `Other` targets without an override use their raw
/// name as the model identifier.
pub fn resolve_model(config: &GlobalConfig, target: &ModelTarget) -> String {
    if let Some(overridden) = config
        .model_overrides
        .iter()
        .find(|o| &o.target == target)
    {
        return overridden.model.clone();
    }

    match target {
        ModelTarget::Claude => "claude-sonnet-4-20250514".to_string(),
        ModelTarget::Gpt => "gpt-4o".to_string(),
        ModelTarget::Gemini => "gemini-2.5-pro".to_string(),
        ModelTarget::Other(name) => name.clone(),
    }
}

/// Resolve the effective max-tokens budget, enforcing the floor.
pub fn resolve_max_tokens(config: &GlobalConfig) -> u32 {
    config.max_tokens.max(MIN_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.max_tokens, 4_096);
        assert_eq!(config.default_target, ModelTarget::Claude);
        assert!(config.model_overrides.is_empty());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
default_target = "gpt"
max_tokens = 8192
temperature = 0.4

[[model_overrides]]
target = "claude"
model = "claude-opus-4-20250514"
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.default_target, ModelTarget::Gpt);
        assert_eq!(config.max_tokens, 8_192);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.model_overrides.len(), 1);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.max_tokens, 4_096);
    }

    #[test]
    fn resolve_model_prefers_overrides() {
        let config = GlobalConfig {
            model_overrides: vec![ModelOverride {
                target: ModelTarget::Claude,
                model: "claude-opus-4-20250514".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(
            resolve_model(&config, &ModelTarget::Claude),
            "claude-opus-4-20250514"
        );
        assert_eq!(resolve_model(&config, &ModelTarget::Gpt), "gpt-4o");
    }

    #[test]
    fn resolve_model_uses_raw_name_for_open_set_targets() {
        let config = GlobalConfig::default();
        assert_eq!(
            resolve_model(&config, &ModelTarget::Other("llama-local".to_string())),
            "llama-local"
        );
    }

    #[test]
    fn resolve_max_tokens_enforces_floor() {
        let config = GlobalConfig {
            max_tokens: 16,
            ..Default::default()
        };
        assert_eq!(resolve_max_tokens(&config), 256);
    }
}
