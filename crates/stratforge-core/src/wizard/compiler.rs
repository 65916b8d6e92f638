//! Deterministic prompt compiler.
//!
//! `compile` renders the accumulated wizard state into a single text
//! artifact: a model-target header, one numbered section per filled and
//! un-skipped stage in ascending index order, an optional custom-notes
//! section, and a model-target instruction footer, joined with blank lines.
//!
//! The compiler is pure and read-only: for a fixed `WizardState` snapshot
//! and target it returns byte-identical output on every call. Skipped or
//! empty stages are omitted entirely -- no placeholder, no empty heading.

use stratforge_types::strategy::{
    ResearchSummary, RiskSettings, SentimentSnapshot, StrategyParameters, StrategyTemplate,
    SwapSettings, TokenSelection,
};
use stratforge_types::wizard::{ModelTarget, Stage, StageKey, WizardState};

use crate::wizard::format;
use crate::wizard::stages::STAGES;
use crate::wizard::state::WizardStateExt;

// ---------------------------------------------------------------------------
// Model-target templates
// ---------------------------------------------------------------------------

/// Persona/framing header for a model target. Carries no state.
fn header_for(target: &ModelTarget) -> &'static str {
    match target {
        ModelTarget::Claude => {
            "You are an expert quantitative crypto-trading strategist. Reason \
carefully about the configuration below, weighing each input against the \
others before writing the strategy. Think through market regime, liquidity, \
and failure modes explicitly."
        }
        ModelTarget::Gpt => {
            "Act as a senior crypto quant. Using the configuration sections \
below, design a complete trading strategy. Be systematic: derive every rule \
from the supplied inputs and state your assumptions inline."
        }
        ModelTarget::Gemini => {
            "You are a disciplined algorithmic-trading strategist for digital \
assets. Read every configuration section below, then produce one coherent \
strategy that reconciles all of them."
        }
        ModelTarget::Other(_) => {
            "You are a crypto-trading strategist. Build a complete trading \
strategy from the configuration sections below."
        }
    }
}

/// Generation-instruction footer for a model target.
fn footer_for(target: &ModelTarget) -> &'static str {
    match target {
        ModelTarget::Claude => {
            "Produce the strategy as structured markdown with these sections: \
Overview, Entry Conditions, Exit Conditions, Position Sizing, Risk Controls, \
and Known Weaknesses. Be explicit about uncertainty and avoid invented \
numbers: only use figures provided above."
        }
        ModelTarget::Gpt => {
            "Output the strategy as numbered markdown sections: 1. Overview, \
2. Entry Conditions, 3. Exit Conditions, 4. Position Sizing, 5. Risk \
Controls. Keep the tone concise and actionable; do not add disclaimers \
beyond a single closing risk note."
        }
        ModelTarget::Gemini => {
            "Respond with a markdown strategy document containing: Overview, \
Signal Logic, Entry/Exit Rules, Sizing and Risk, and a short Backtest Plan. \
Prefer tables for rule lists. Do not restate the configuration verbatim."
        }
        ModelTarget::Other(_) => {
            "Respond with a complete markdown strategy document covering \
entries, exits, sizing, and risk controls, derived only from the inputs \
above."
        }
    }
}

// ---------------------------------------------------------------------------
// Compile
// ---------------------------------------------------------------------------

/// Compile the wizard state into the prompt artifact.
///
/// Read-only and deterministic. Section ordering always follows
/// `Stage::index` ascending; a section appears only when its stage is not
/// skipped and holds data. Custom notes form a final numbered section
/// independent of any stage's skip state. With everything skipped and no
/// notes, the output is header + footer only -- still a valid artifact.
pub fn compile(state: &WizardState, target: &ModelTarget) -> String {
    let mut parts = Vec::with_capacity(STAGES.len() + 3);
    parts.push(header_for(target).to_string());

    let mut section_no = 1;
    for stage in &STAGES {
        if state.is_skipped(stage.index) || !state.has_stage_data(stage.key) {
            continue;
        }
        if let Some(body) = render_stage(stage, state) {
            parts.push(format!("## {section_no}. {}\n{body}", stage.section_title));
            section_no += 1;
        }
    }

    if let Some(notes) = state.custom_notes.as_deref() {
        let trimmed = notes.trim();
        if !trimmed.is_empty() {
            parts.push(format!("## {section_no}. Custom Modifications\n{trimmed}"));
        }
    }

    parts.push(footer_for(target).to_string());
    parts.join("\n\n")
}

// ---------------------------------------------------------------------------
// Stage renderers
// ---------------------------------------------------------------------------

fn render_stage(stage: &Stage, state: &WizardState) -> Option<String> {
    let draft = &state.draft;
    match stage.key {
        StageKey::AssetSelection => draft.token.as_ref().map(render_token),
        StageKey::StrategyTemplate => draft.template.as_ref().map(render_template),
        StageKey::Sentiment => draft.sentiment.as_ref().map(render_sentiment),
        StageKey::Research => draft.research.as_ref().map(render_research),
        StageKey::Parameters => draft.parameters.as_ref().map(render_parameters),
        StageKey::Risk => draft.risk.as_ref().map(render_risk),
        StageKey::Swap => draft.swap.as_ref().map(render_swap),
    }
}

fn bullet_list(heading: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut out = format!("- {heading}:");
    for item in items {
        out.push_str(&format!("\n  - {item}"));
    }
    Some(out)
}

fn render_token(token: &TokenSelection) -> String {
    let mut lines = vec![format!("- Symbol: {}", token.symbol)];
    if let Some(name) = &token.name {
        lines.push(format!("- Name: {name}"));
    }
    if let Some(price) = token.price_usd {
        lines.push(format!("- Current price: {}", format::usd(price)));
    }
    if let Some(change) = token.change_24h_pct {
        lines.push(format!("- 24h change: {}", format::signed_pct(change)));
    }
    if let Some(cap) = token.market_cap_usd {
        lines.push(format!("- Market cap: {}", format::usd(cap)));
    }
    lines.join("\n")
}

fn render_template(template: &StrategyTemplate) -> String {
    let mut lines = vec![
        format!("- Template: {}", template.name),
        format!("- Style: {}", template.style),
        format!("- Timeframe: {}", template.timeframe),
    ];
    if let Some(win_rate) = template.win_rate_pct {
        lines.push(format!("- Historical win rate: {}", format::pct(win_rate)));
    }
    if let Some(entries) = bullet_list("Entry rules", &template.entry_rules) {
        lines.push(entries);
    }
    if let Some(exits) = bullet_list("Exit rules", &template.exit_rules) {
        lines.push(exits);
    }
    lines.join("\n")
}

fn render_sentiment(sentiment: &SentimentSnapshot) -> String {
    let mut lines = vec![format!(
        "- Overall sentiment: {} (score {:.2})",
        sentiment.classification, sentiment.overall_score
    )];
    if let Some(volume) = sentiment.social_volume {
        lines.push(format!("- Social volume: {volume} mentions/24h"));
    }
    if let Some(news) = sentiment.news_score {
        lines.push(format!("- News score: {news:.2}"));
    }
    if let Some(topics) = bullet_list("Trending topics", &sentiment.trending_topics) {
        lines.push(topics);
    }
    lines.join("\n")
}

fn render_research(research: &ResearchSummary) -> String {
    let mut lines = vec![format!("- Title: {}", research.title)];
    if let Some(source) = &research.source {
        lines.push(format!("- Source: {source}"));
    }
    lines.push(format!("- Summary: {}", research.summary));
    if let Some(findings) = bullet_list("Key findings", &research.key_findings) {
        lines.push(findings);
    }
    lines.join("\n")
}

fn render_parameters(params: &StrategyParameters) -> String {
    let mut lines = vec![
        format!(
            "- Initial capital: {}",
            format::usd(params.initial_capital_usd)
        ),
        format!(
            "- Position size: {} of capital per trade",
            format::pct(params.position_size_pct)
        ),
    ];
    if let Some(lev) = params.leverage {
        lines.push(format!("- Leverage: {}", format::leverage(lev)));
    }
    lines.push(format!("- Stop loss: {}", format::pct(params.stop_loss_pct)));
    lines.push(format!(
        "- Take profit: {}",
        format::pct(params.take_profit_pct)
    ));
    lines.join("\n")
}

fn render_risk(risk: &RiskSettings) -> String {
    let mut lines = Vec::new();
    if let Some(drawdown) = risk.max_drawdown_pct {
        lines.push(format!("- Max drawdown: {}", format::pct(drawdown)));
    }
    if let Some(limit) = risk.daily_loss_limit_usd {
        lines.push(format!("- Daily loss limit: {}", format::usd(limit)));
    }
    if let Some(per_trade) = risk.risk_per_trade_pct {
        lines.push(format!("- Risk per trade: {}", format::pct(per_trade)));
    }
    if let Some(trailing) = risk.trailing_stop {
        lines.push(format!(
            "- Trailing stop: {}",
            if trailing { "enabled" } else { "disabled" }
        ));
    }
    lines.join("\n")
}

fn render_swap(swap: &SwapSettings) -> String {
    let mut lines = Vec::new();
    if let Some(enabled) = swap.enabled {
        lines.push(format!(
            "- Auto-swap: {}",
            if enabled { "enabled" } else { "disabled" }
        ));
    }
    if let Some(stablecoin) = &swap.stablecoin {
        lines.push(format!("- Target stablecoin: {stablecoin}"));
    }
    if let Some(slippage) = swap.slippage_pct {
        lines.push(format!("- Max slippage: {}", format::pct(slippage)));
    }
    if let Some(threshold) = swap.auto_convert_threshold_pct {
        lines.push(format!(
            "- Auto-convert threshold: {}",
            format::pct(threshold)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::new_wizard_state;
    use serde_json::json;
    use uuid::Uuid;

    fn test_state() -> WizardState {
        new_wizard_state(Uuid::now_v7(), ModelTarget::Claude)
    }

    fn fill_asset(state: &mut WizardState) {
        state
            .set_stage_data(
                StageKey::AssetSelection,
                json!({"symbol": "SOL", "name": "Solana", "price_usd": 142.5,
                       "change_24h_pct": 3.2, "market_cap_usd": 65_000_000.0}),
            )
            .unwrap();
    }

    #[test]
    fn sections_follow_stage_index_order_regardless_of_fill_order() {
        let mut state = test_state();
        // Fill in deliberately reversed order.
        state
            .set_stage_data(StageKey::Swap, json!({"stablecoin": "USDC"}))
            .unwrap();
        state
            .set_stage_data(StageKey::Risk, json!({"max_drawdown_pct": 15.0}))
            .unwrap();
        fill_asset(&mut state);

        let prompt = compile(&state, &ModelTarget::Claude);
        let asset = prompt.find("Target Asset").unwrap();
        let risk = prompt.find("Risk Management").unwrap();
        let swap = prompt.find("Auto-Swap Settings").unwrap();
        assert!(asset < risk && risk < swap);
    }

    #[test]
    fn skipped_stages_are_omitted_even_with_data() {
        let mut state = test_state();
        fill_asset(&mut state);
        state
            .set_stage_data(StageKey::Risk, json!({"max_drawdown_pct": 15.0}))
            .unwrap();
        state.skip(5).unwrap();

        let prompt = compile(&state, &ModelTarget::Claude);
        assert!(prompt.contains("Target Asset"));
        assert!(!prompt.contains("Risk Management"));
        assert!(!prompt.contains("Max drawdown"));
    }

    #[test]
    fn empty_stages_get_no_placeholder() {
        let state = test_state();
        let prompt = compile(&state, &ModelTarget::Claude);
        for stage in &STAGES {
            assert!(!prompt.contains(stage.section_title));
        }
    }

    #[test]
    fn compile_is_idempotent() {
        let mut state = test_state();
        fill_asset(&mut state);
        state.set_custom_notes(Some("prefer limit orders".to_string()));
        let first = compile(&state, &ModelTarget::Gpt);
        let second = compile(&state, &ModelTarget::Gpt);
        assert_eq!(first, second);
    }

    #[test]
    fn skip_then_unskip_restores_the_section_without_reentry() {
        let mut state = test_state();
        fill_asset(&mut state);
        state.skip(0).unwrap();
        assert!(!compile(&state, &ModelTarget::Claude).contains("Target Asset"));
        state.unskip(0).unwrap();
        let prompt = compile(&state, &ModelTarget::Claude);
        assert!(prompt.contains("Target Asset"));
        assert!(prompt.contains("- Symbol: SOL"));
    }

    #[test]
    fn model_target_changes_framing_but_not_inclusion() {
        let mut state = test_state();
        fill_asset(&mut state);
        state
            .set_stage_data(StageKey::Sentiment, json!({
                "overall_score": 0.6, "classification": "bullish"
            }))
            .unwrap();

        let claude = compile(&state, &ModelTarget::Claude);
        let gpt = compile(&state, &ModelTarget::Gpt);
        assert_ne!(claude, gpt);

        for prompt in [&claude, &gpt] {
            assert!(prompt.contains("Target Asset"));
            assert!(prompt.contains("Market Sentiment"));
            assert!(!prompt.contains("Risk Management"));
        }
    }

    #[test]
    fn unknown_target_falls_back_to_generic_templates() {
        let mut state = test_state();
        fill_asset(&mut state);
        let prompt = compile(&state, &ModelTarget::Other("llama-local".to_string()));
        assert!(prompt.starts_with("You are a crypto-trading strategist."));
        assert!(prompt.contains("- Symbol: SOL"));
    }

    #[test]
    fn all_skipped_yields_header_and_footer_only() {
        let mut state = test_state();
        fill_asset(&mut state);
        for index in 0..STAGES.len() {
            state.skipped.insert(index);
        }
        let prompt = compile(&state, &ModelTarget::Gemini);
        assert!(!prompt.is_empty());
        assert!(!prompt.contains("##"));
        assert!(prompt.starts_with(header_for(&ModelTarget::Gemini)));
        assert!(prompt.ends_with(footer_for(&ModelTarget::Gemini)));
    }

    #[test]
    fn custom_notes_always_append_as_final_numbered_section() {
        let mut state = test_state();
        fill_asset(&mut state);
        state.skip(1).unwrap();
        state.set_custom_notes(Some("only trade during US hours".to_string()));

        let prompt = compile(&state, &ModelTarget::Claude);
        assert!(prompt.contains("## 2. Custom Modifications"));
        assert!(prompt.contains("only trade during US hours"));
        // Notes appear after every stage section and before the footer.
        let notes_at = prompt.find("Custom Modifications").unwrap();
        let asset_at = prompt.find("Target Asset").unwrap();
        let footer_at = prompt.find(footer_for(&ModelTarget::Claude)).unwrap();
        assert!(asset_at < notes_at && notes_at < footer_at);
    }

    #[test]
    fn section_numbering_skips_omitted_stages() {
        let mut state = test_state();
        fill_asset(&mut state);
        state
            .set_stage_data(StageKey::Swap, json!({"enabled": true, "stablecoin": "USDC"}))
            .unwrap();
        state.skip(1).unwrap();

        let prompt = compile(&state, &ModelTarget::Claude);
        assert!(prompt.contains("## 1. Target Asset"));
        assert!(prompt.contains("## 2. Auto-Swap Settings"));
    }

    /// The example scenario from the product flow: asset filled, risk
    /// skipped, swap filled.
    #[test]
    fn asset_skip_risk_swap_scenario() {
        let mut state = test_state();
        fill_asset(&mut state);
        state
            .set_stage_data(StageKey::Risk, json!({"max_drawdown_pct": 20.0}))
            .unwrap();
        state
            .set_stage_data(StageKey::Swap, json!({"enabled": true, "stablecoin": "USDC"}))
            .unwrap();
        state.skip(5).unwrap();

        let prompt = compile(&state, &ModelTarget::Gpt);
        assert!(prompt.starts_with(header_for(&ModelTarget::Gpt)));
        assert!(prompt.ends_with(footer_for(&ModelTarget::Gpt)));
        assert!(prompt.contains("- Symbol: SOL"));
        assert!(!prompt.contains("Risk Management"));
        assert!(prompt.contains("- Target stablecoin: USDC"));
        let asset_at = prompt.find("Target Asset").unwrap();
        let swap_at = prompt.find("Auto-Swap Settings").unwrap();
        assert!(asset_at < swap_at);
    }

    #[test]
    fn numeric_fields_use_fixed_precision_and_abbreviation() {
        let mut state = test_state();
        fill_asset(&mut state);
        state
            .set_stage_data(StageKey::Parameters, json!({
                "initial_capital_usd": 25_000.0,
                "position_size_pct": 5.0,
                "leverage": 3.0,
                "stop_loss_pct": 2.5,
                "take_profit_pct": 7.5
            }))
            .unwrap();

        let prompt = compile(&state, &ModelTarget::Claude);
        assert!(prompt.contains("- Current price: $142.50"));
        assert!(prompt.contains("- 24h change: +3.2%"));
        assert!(prompt.contains("- Market cap: $65.0M"));
        assert!(prompt.contains("- Initial capital: $25.0K"));
        assert!(prompt.contains("- Leverage: 3x"));
        assert!(prompt.contains("- Stop loss: 2.5%"));
    }
}
