//! The ordered stage table.
//!
//! `STAGES` is the single source of truth for stage ordering and section
//! titles. Compiled prompt sections always follow `Stage::index` ascending,
//! regardless of the order stages were visited or filled.

use stratforge_types::wizard::{Stage, StageKey};

/// All wizard stages, ascending by index.
///
/// No stage is currently required; the flag is modeled but never enforced.
pub const STAGES: [Stage; 7] = [
    Stage {
        index: 0,
        key: StageKey::AssetSelection,
        required: false,
        section_title: "Target Asset",
    },
    Stage {
        index: 1,
        key: StageKey::StrategyTemplate,
        required: false,
        section_title: "Traditional Strategy Base",
    },
    Stage {
        index: 2,
        key: StageKey::Sentiment,
        required: false,
        section_title: "Market Sentiment",
    },
    Stage {
        index: 3,
        key: StageKey::Research,
        required: false,
        section_title: "Research Context",
    },
    Stage {
        index: 4,
        key: StageKey::Parameters,
        required: false,
        section_title: "Strategy Parameters",
    },
    Stage {
        index: 5,
        key: StageKey::Risk,
        required: false,
        section_title: "Risk Management",
    },
    Stage {
        index: 6,
        key: StageKey::Swap,
        required: false,
        section_title: "Auto-Swap Settings",
    },
];

/// Number of wizard stages.
pub const STAGE_COUNT: usize = STAGES.len();

/// Look up a stage descriptor by key.
pub fn stage_for_key(key: StageKey) -> &'static Stage {
    // The table covers every StageKey variant, so this cannot miss.
    STAGES
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&STAGES[0])
}

/// Look up a stage descriptor by index.
pub fn stage_at(index: usize) -> Option<&'static Stage> {
    STAGES.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_indices_are_dense_and_ascending() {
        for (position, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.index, position);
        }
    }

    #[test]
    fn every_key_resolves_to_its_own_stage() {
        for stage in &STAGES {
            assert_eq!(stage_for_key(stage.key).index, stage.index);
        }
    }

    #[test]
    fn stage_at_rejects_out_of_table_indices() {
        assert!(stage_at(STAGE_COUNT).is_none());
        assert_eq!(stage_at(0).unwrap().key, StageKey::AssetSelection);
    }
}
