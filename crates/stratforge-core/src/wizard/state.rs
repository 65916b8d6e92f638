//! WizardState registry operations.
//!
//! The `WizardState` struct lives in `stratforge-types`; this module provides
//! an extension trait (`WizardStateExt`) with the registry operations:
//! navigation, skip/un-skip, stage data entry, and reset. The extension
//! trait pattern is used because Rust does not allow inherent impls for
//! types defined in another crate.
//!
//! Transitions never validate stage content -- the flow allows advancing
//! with empty or default parameters. The only content check in the product
//! is at the terminal generate action, which is a caller-level concern
//! (`generation::service`).

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

use stratforge_types::error::WizardError;
use stratforge_types::strategy::StrategyDraft;
use stratforge_types::wizard::{ModelTarget, StageKey, WizardState};

use crate::wizard::stages::STAGE_COUNT;

/// Create a new `WizardState` for a fresh session at stage 0.
pub fn new_wizard_state(session_id: Uuid, model_target: ModelTarget) -> WizardState {
    WizardState {
        session_id,
        created_at: Utc::now(),
        current_index: 0,
        skipped: BTreeSet::new(),
        draft: StrategyDraft::default(),
        custom_notes: None,
        model_target,
    }
}

/// Extension trait with the stage-registry operations.
///
/// All mutation of `WizardState` goes through this trait; the compiler only
/// ever reads the state. Boundary failures leave `current_index` unchanged.
pub trait WizardStateExt {
    /// Move to the next stage. Fails with `OutOfRange` at the last stage;
    /// the caller transitions to the terminal result view instead.
    fn advance(&mut self) -> Result<(), WizardError>;

    /// Move to the previous stage. Fails with `OutOfRange` at stage 0.
    fn go_back(&mut self) -> Result<(), WizardError>;

    /// Mark a stage skipped, then advance ("mark + advance"). The mark is
    /// applied before the transition, so skipping the last stage still
    /// excludes it from compilation even though the advance half fails.
    /// Never clears the stage's data; re-skipping an already-skipped stage
    /// leaves the mark set and just advances again.
    fn skip(&mut self, stage_index: usize) -> Result<(), WizardError>;

    /// Remove a stage's skip mark. Does not change `current_index` and does
    /// not touch the stage's data. No-op when the stage was not skipped.
    fn unskip(&mut self, stage_index: usize) -> Result<(), WizardError>;

    /// Whether a stage is currently marked skipped.
    fn is_skipped(&self, stage_index: usize) -> bool;

    /// Store the value bag for a stage. Composite stages (`risk`, `swap`)
    /// shallow-merge the incoming JSON object over the stored bag; every
    /// other stage is replaced whole.
    fn set_stage_data(&mut self, key: StageKey, value: Value) -> Result<(), WizardError>;

    /// Whether a stage currently holds usable data (composite bags with no
    /// field set count as absent).
    fn has_stage_data(&self, key: StageKey) -> bool;

    /// Set or clear the free-text custom modifications.
    fn set_custom_notes(&mut self, notes: Option<String>);

    /// Select the compiler template variant.
    fn set_model_target(&mut self, target: ModelTarget);

    /// Whether the wizard sits on the final stage.
    fn is_last_stage(&self) -> bool;

    /// Re-create the session in place: stage 0, nothing skipped, no data.
    /// Session identity (`session_id`, `created_at`) is preserved;
    /// everything else is reinitialized, including the model target,
    /// which returns to the default.
    fn reset(&mut self);
}

impl WizardStateExt for WizardState {
    fn advance(&mut self) -> Result<(), WizardError> {
        if self.current_index + 1 >= STAGE_COUNT {
            return Err(WizardError::OutOfRange {
                attempted: self.current_index as i64 + 1,
                stage_count: STAGE_COUNT,
            });
        }
        self.current_index += 1;
        Ok(())
    }

    fn go_back(&mut self) -> Result<(), WizardError> {
        if self.current_index == 0 {
            return Err(WizardError::OutOfRange {
                attempted: -1,
                stage_count: STAGE_COUNT,
            });
        }
        self.current_index -= 1;
        Ok(())
    }

    fn skip(&mut self, stage_index: usize) -> Result<(), WizardError> {
        if stage_index >= STAGE_COUNT {
            return Err(WizardError::OutOfRange {
                attempted: stage_index as i64,
                stage_count: STAGE_COUNT,
            });
        }
        self.skipped.insert(stage_index);
        self.advance()
    }

    fn unskip(&mut self, stage_index: usize) -> Result<(), WizardError> {
        if stage_index >= STAGE_COUNT {
            return Err(WizardError::OutOfRange {
                attempted: stage_index as i64,
                stage_count: STAGE_COUNT,
            });
        }
        self.skipped.remove(&stage_index);
        Ok(())
    }

    fn is_skipped(&self, stage_index: usize) -> bool {
        self.skipped.contains(&stage_index)
    }

    fn set_stage_data(&mut self, key: StageKey, value: Value) -> Result<(), WizardError> {
        let invalid = |e: serde_json::Error| WizardError::InvalidStageData {
            stage: key.to_string(),
            message: e.to_string(),
        };

        match key {
            StageKey::AssetSelection => {
                self.draft.token = Some(serde_json::from_value(value).map_err(invalid)?);
            }
            StageKey::StrategyTemplate => {
                self.draft.template = Some(serde_json::from_value(value).map_err(invalid)?);
            }
            StageKey::Sentiment => {
                self.draft.sentiment = Some(serde_json::from_value(value).map_err(invalid)?);
            }
            StageKey::Research => {
                self.draft.research = Some(serde_json::from_value(value).map_err(invalid)?);
            }
            StageKey::Parameters => {
                self.draft.parameters = Some(serde_json::from_value(value).map_err(invalid)?);
            }
            StageKey::Risk => {
                let merged = shallow_merge(
                    serde_json::to_value(self.draft.risk.clone().unwrap_or_default())
                        .map_err(invalid)?,
                    value,
                    key,
                )?;
                self.draft.risk = Some(serde_json::from_value(merged).map_err(invalid)?);
            }
            StageKey::Swap => {
                let merged = shallow_merge(
                    serde_json::to_value(self.draft.swap.clone().unwrap_or_default())
                        .map_err(invalid)?,
                    value,
                    key,
                )?;
                self.draft.swap = Some(serde_json::from_value(merged).map_err(invalid)?);
            }
        }
        Ok(())
    }

    fn has_stage_data(&self, key: StageKey) -> bool {
        match key {
            StageKey::AssetSelection => self.draft.token.is_some(),
            StageKey::StrategyTemplate => self.draft.template.is_some(),
            StageKey::Sentiment => self.draft.sentiment.is_some(),
            StageKey::Research => self.draft.research.is_some(),
            StageKey::Parameters => self.draft.parameters.is_some(),
            StageKey::Risk => self.draft.risk.as_ref().is_some_and(|r| !r.is_empty()),
            StageKey::Swap => self.draft.swap.as_ref().is_some_and(|s| !s.is_empty()),
        }
    }

    fn set_custom_notes(&mut self, notes: Option<String>) {
        self.custom_notes = notes.filter(|n| !n.trim().is_empty());
    }

    fn set_model_target(&mut self, target: ModelTarget) {
        self.model_target = target;
    }

    fn is_last_stage(&self) -> bool {
        self.current_index == STAGE_COUNT - 1
    }

    fn reset(&mut self) {
        let created_at = self.created_at;
        *self = new_wizard_state(self.session_id, ModelTarget::default());
        self.created_at = created_at;
    }
}

/// Overlay the top-level keys of `patch` onto `base`.
///
/// Used for the composite stages, which accumulate settings across
/// multiple submissions instead of replacing them.
fn shallow_merge(mut base: Value, patch: Value, key: StageKey) -> Result<Value, WizardError> {
    let Value::Object(patch_map) = patch else {
        return Err(WizardError::InvalidStageData {
            stage: key.to_string(),
            message: "expected a JSON object".to_string(),
        });
    };
    if let Some(base_map) = base.as_object_mut() {
        for (field, value) in patch_map {
            base_map.insert(field, value);
        }
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> WizardState {
        new_wizard_state(Uuid::now_v7(), ModelTarget::Claude)
    }

    #[test]
    fn advance_walks_to_the_last_stage_then_fails() {
        let mut state = test_state();
        for expected in 1..STAGE_COUNT {
            state.advance().unwrap();
            assert_eq!(state.current_index, expected);
        }
        let err = state.advance().unwrap_err();
        assert!(matches!(err, WizardError::OutOfRange { .. }));
        assert_eq!(state.current_index, STAGE_COUNT - 1);
    }

    #[test]
    fn go_back_at_stage_zero_fails_and_leaves_index() {
        let mut state = test_state();
        let err = state.go_back().unwrap_err();
        assert!(matches!(
            err,
            WizardError::OutOfRange { attempted: -1, .. }
        ));
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn skip_marks_and_advances() {
        let mut state = test_state();
        state.skip(0).unwrap();
        assert!(state.is_skipped(0));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn skip_is_idempotent() {
        let mut state = test_state();
        state.skip(0).unwrap();
        state.skip(0).unwrap();
        assert!(state.is_skipped(0));
        assert_eq!(state.current_index, 2);
        assert_eq!(state.skipped.len(), 1);
    }

    #[test]
    fn skip_at_last_stage_keeps_the_mark() {
        let mut state = test_state();
        state.current_index = STAGE_COUNT - 1;
        let err = state.skip(STAGE_COUNT - 1).unwrap_err();
        assert!(matches!(err, WizardError::OutOfRange { .. }));
        assert!(state.is_skipped(STAGE_COUNT - 1));
        assert_eq!(state.current_index, STAGE_COUNT - 1);
    }

    #[test]
    fn unskip_restores_without_touching_index_or_data() {
        let mut state = test_state();
        state
            .set_stage_data(StageKey::AssetSelection, json!({"symbol": "SOL"}))
            .unwrap();
        state.skip(0).unwrap();
        state.unskip(0).unwrap();
        assert!(!state.is_skipped(0));
        assert_eq!(state.current_index, 1);
        assert_eq!(state.draft.token.as_ref().unwrap().symbol, "SOL");
    }

    #[test]
    fn skip_never_clears_stage_data() {
        let mut state = test_state();
        state
            .set_stage_data(StageKey::Parameters, json!({
                "initial_capital_usd": 10_000.0,
                "position_size_pct": 5.0,
                "stop_loss_pct": 2.0,
                "take_profit_pct": 6.0
            }))
            .unwrap();
        state.skip(4).unwrap();
        assert!(state.draft.parameters.is_some());
    }

    #[test]
    fn scalar_stage_data_is_replaced_whole() {
        let mut state = test_state();
        state
            .set_stage_data(
                StageKey::AssetSelection,
                json!({"symbol": "SOL", "name": "Solana"}),
            )
            .unwrap();
        state
            .set_stage_data(StageKey::AssetSelection, json!({"symbol": "ETH"}))
            .unwrap();
        let token = state.draft.token.as_ref().unwrap();
        assert_eq!(token.symbol, "ETH");
        // Full replace: the previous name does not survive.
        assert!(token.name.is_none());
    }

    #[test]
    fn composite_stage_data_is_shallow_merged() {
        let mut state = test_state();
        state
            .set_stage_data(StageKey::Risk, json!({"max_drawdown_pct": 15.0}))
            .unwrap();
        state
            .set_stage_data(StageKey::Risk, json!({"risk_per_trade_pct": 1.0}))
            .unwrap();
        let risk = state.draft.risk.as_ref().unwrap();
        assert_eq!(risk.max_drawdown_pct, Some(15.0));
        assert_eq!(risk.risk_per_trade_pct, Some(1.0));
    }

    #[test]
    fn composite_stage_rejects_non_object_payloads() {
        let mut state = test_state();
        let err = state
            .set_stage_data(StageKey::Swap, json!("USDC"))
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidStageData { .. }));
    }

    #[test]
    fn undecodable_stage_data_is_rejected() {
        let mut state = test_state();
        let err = state
            .set_stage_data(StageKey::Sentiment, json!({"overall_score": "high"}))
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidStageData { .. }));
        assert!(state.draft.sentiment.is_none());
    }

    #[test]
    fn empty_composite_bag_counts_as_no_data() {
        let mut state = test_state();
        state.set_stage_data(StageKey::Risk, json!({})).unwrap();
        assert!(!state.has_stage_data(StageKey::Risk));
        state
            .set_stage_data(StageKey::Risk, json!({"trailing_stop": true}))
            .unwrap();
        assert!(state.has_stage_data(StageKey::Risk));
    }

    #[test]
    fn blank_custom_notes_are_dropped() {
        let mut state = test_state();
        state.set_custom_notes(Some("   ".to_string()));
        assert!(state.custom_notes.is_none());
        state.set_custom_notes(Some("prefer limit orders".to_string()));
        assert_eq!(state.custom_notes.as_deref(), Some("prefer limit orders"));
    }

    #[test]
    fn reset_reinitializes_everything_but_session_identity() {
        let mut state = new_wizard_state(Uuid::now_v7(), ModelTarget::Gpt);
        let id = state.session_id;
        let created_at = state.created_at;
        state
            .set_stage_data(StageKey::AssetSelection, json!({"symbol": "SOL"}))
            .unwrap();
        state.skip(1).unwrap();
        state.set_custom_notes(Some("notes".to_string()));
        state.reset();

        assert_eq!(state.session_id, id);
        assert_eq!(state.created_at, created_at);
        assert_eq!(state.current_index, 0);
        assert!(state.skipped.is_empty());
        assert_eq!(state.draft, StrategyDraft::default());
        assert!(state.custom_notes.is_none());
        // The model target is not part of session identity.
        assert_eq!(state.model_target, ModelTarget::default());
    }
}
