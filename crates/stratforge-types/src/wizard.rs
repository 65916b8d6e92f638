//! Wizard stage model and session state.
//!
//! A wizard session steps through a fixed, ordered list of configuration
//! stages. Each stage can be filled, skipped, or left empty; the accumulated
//! state is compiled into a prompt by `stratforge-core`. The state struct
//! lives here so every layer (core, infra, api) shares one definition;
//! the operations on it live in `stratforge-core::wizard::state`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::strategy::StrategyDraft;

/// Stable identifier for a wizard stage.
///
/// The wire form is kebab-case (e.g. `asset-selection`); stage ordering is
/// defined by the stage table in `stratforge-core`, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKey {
    AssetSelection,
    StrategyTemplate,
    Sentiment,
    Research,
    Parameters,
    Risk,
    Swap,
}

impl StageKey {
    /// Kebab-case wire identifier for this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::AssetSelection => "asset-selection",
            StageKey::StrategyTemplate => "strategy-template",
            StageKey::Sentiment => "sentiment",
            StageKey::Research => "research",
            StageKey::Parameters => "parameters",
            StageKey::Risk => "risk",
            StageKey::Swap => "swap",
        }
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset-selection" => Ok(StageKey::AssetSelection),
            "strategy-template" => Ok(StageKey::StrategyTemplate),
            "sentiment" => Ok(StageKey::Sentiment),
            "research" => Ok(StageKey::Research),
            "parameters" => Ok(StageKey::Parameters),
            "risk" => Ok(StageKey::Risk),
            "swap" => Ok(StageKey::Swap),
            other => Err(format!("unknown stage key: '{other}'")),
        }
    }
}

/// Immutable descriptor for one wizard stage.
///
/// `index` defines the canonical ordering of compiled prompt sections,
/// regardless of the order in which stages were visited or filled.
/// `required` is carried in the model but never enforced on navigation;
/// advancing past an unfilled required stage is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// 0-based position; unique within the stage table.
    pub index: usize,
    /// Stable identifier.
    pub key: StageKey,
    /// Whether this stage is nominally mandatory.
    pub required: bool,
    /// Section title used in the compiled prompt.
    pub section_title: &'static str,
}

/// Which prompt template variant the compiler uses.
///
/// The set is open: unknown identifiers round-trip as `Other` and fall back
/// to the generic header/footer at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelTarget {
    Claude,
    Gpt,
    Gemini,
    Other(String),
}

impl ModelTarget {
    pub fn as_str(&self) -> &str {
        match self {
            ModelTarget::Claude => "claude",
            ModelTarget::Gpt => "gpt",
            ModelTarget::Gemini => "gemini",
            ModelTarget::Other(name) => name.as_str(),
        }
    }

    /// The built-in targets, in presentation order.
    pub fn builtin() -> [ModelTarget; 3] {
        [ModelTarget::Claude, ModelTarget::Gpt, ModelTarget::Gemini]
    }
}

impl fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ModelTarget {
    fn from(s: String) -> Self {
        match s.as_str() {
            "claude" => ModelTarget::Claude,
            "gpt" => ModelTarget::Gpt,
            "gemini" => ModelTarget::Gemini,
            _ => ModelTarget::Other(s),
        }
    }
}

impl From<ModelTarget> for String {
    fn from(t: ModelTarget) -> Self {
        t.as_str().to_string()
    }
}

impl Default for ModelTarget {
    fn default() -> Self {
        ModelTarget::Claude
    }
}

/// Mutable per-session wizard state.
///
/// Owned exclusively by the stage registry in `stratforge-core`; the prompt
/// compiler only ever reads it. Created once per session, discarded (fully
/// re-created) on reset. Nothing is persisted across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Current position, always within `0..stage_count`.
    pub current_index: usize,
    /// Stage indices the user explicitly skipped. Skipping never deletes
    /// the stage's data; un-skipping restores its visibility as-is.
    pub skipped: BTreeSet<usize>,
    /// Accumulated per-stage data bags.
    pub draft: StrategyDraft,
    /// Free-text modifications, not tied to any stage index. Always
    /// considered by the compiler regardless of skip state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_notes: Option<String>,
    /// Selected compiler template variant.
    pub model_target: ModelTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_key_round_trips_through_str() {
        for key in [
            StageKey::AssetSelection,
            StageKey::StrategyTemplate,
            StageKey::Sentiment,
            StageKey::Research,
            StageKey::Parameters,
            StageKey::Risk,
            StageKey::Swap,
        ] {
            assert_eq!(key.as_str().parse::<StageKey>().unwrap(), key);
        }
    }

    #[test]
    fn stage_key_rejects_unknown() {
        assert!("portfolio".parse::<StageKey>().is_err());
    }

    #[test]
    fn model_target_known_names_map_to_variants() {
        assert_eq!(ModelTarget::from("claude".to_string()), ModelTarget::Claude);
        assert_eq!(ModelTarget::from("gpt".to_string()), ModelTarget::Gpt);
        assert_eq!(ModelTarget::from("gemini".to_string()), ModelTarget::Gemini);
    }

    #[test]
    fn model_target_open_set_round_trips() {
        let target = ModelTarget::from("llama-local".to_string());
        assert_eq!(target, ModelTarget::Other("llama-local".to_string()));
        assert_eq!(String::from(target), "llama-local");
    }

    #[test]
    fn model_target_serde_uses_plain_strings() {
        let json = serde_json::to_string(&ModelTarget::Gemini).unwrap();
        assert_eq!(json, "\"gemini\"");
        let back: ModelTarget = serde_json::from_str("\"mistral\"").unwrap();
        assert_eq!(back, ModelTarget::Other("mistral".to_string()));
    }
}
