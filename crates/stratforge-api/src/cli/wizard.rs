//! Interactive strategy wizard (`sforge wizard`).
//!
//! Walks the seven configuration stages with arrow-key selection, back
//! navigation, skipping, and live prompt preview, then submits the
//! compiled prompt to the selected generation backend.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use stratforge_core::wizard::catalog::template_catalog;
use stratforge_core::wizard::compiler::compile;
use stratforge_core::wizard::stages::{stage_at, STAGE_COUNT};
use stratforge_core::wizard::state::{new_wizard_state, WizardStateExt};
use stratforge_types::strategy::{
    RiskSettings, SentimentSnapshot, StrategyParameters, SwapSettings, TokenSelection,
};
use stratforge_types::wizard::{ModelTarget, StageKey, WizardState};

use crate::state::AppState;

/// Per-stage action chosen from the wizard menu.
enum StageAction {
    Fill,
    Skip,
    Back,
    Preview,
    Quit,
}

/// Outcome of the final menu.
enum FinalAction {
    Generate,
    BackToStages,
    Quit,
}

/// Run the interactive wizard end to end.
pub async fn run_wizard(state: &AppState, target: Option<String>) -> Result<()> {
    let target = target
        .map(ModelTarget::from)
        .unwrap_or_else(|| state.config.default_target.clone());

    let mut wizard = new_wizard_state(Uuid::now_v7(), target);

    println!();
    println!(
        "  {} Strategy wizard -- compiling for {}",
        style("*").cyan().bold(),
        style(wizard.model_target.to_string()).yellow()
    );

    loop {
        if run_stage_loop(&mut wizard)? {
            return abandoned();
        }

        match run_final_menu(&mut wizard)? {
            FinalAction::Generate => return generate(state, &wizard).await,
            FinalAction::BackToStages => {
                // Step off the last stage so the loop has somewhere to go.
                if wizard.go_back().is_err() {
                    continue;
                }
            }
            FinalAction::Quit => return abandoned(),
        }
    }
}

fn abandoned() -> Result<()> {
    println!();
    println!("  Wizard abandoned, nothing was generated.");
    Ok(())
}

/// Walk stages until the last one settles. Returns true when the user quit.
fn run_stage_loop(wizard: &mut WizardState) -> Result<bool> {
    loop {
        let stage = match stage_at(wizard.current_index) {
            Some(s) => s,
            None => return Ok(false),
        };

        println!();
        println!(
            "  {} Stage {}/{}: {}{}",
            style(">").cyan().bold(),
            stage.index + 1,
            STAGE_COUNT,
            style(stage.section_title).bold(),
            if wizard.is_skipped(stage.index) {
                style(" (skipped)").dim().to_string()
            } else {
                String::new()
            }
        );

        match prompt_stage_action()? {
            StageAction::Fill => {
                let value = prompt_stage_value(stage.key)?;
                wizard
                    .set_stage_data(stage.key, value)
                    .context("Stage data was rejected")?;
                wizard.unskip(stage.index)?;
                if wizard.is_last_stage() {
                    return Ok(false);
                }
                wizard.advance()?;
            }
            StageAction::Skip => {
                // At the last stage the mark lands even though the cursor
                // can't move further.
                let at_last = wizard.is_last_stage();
                let _ = wizard.skip(stage.index);
                if at_last {
                    return Ok(false);
                }
            }
            StageAction::Back => {
                if wizard.go_back().is_err() {
                    println!("  {}", style("Already at the first stage.").dim());
                }
            }
            StageAction::Preview => print_preview(wizard),
            StageAction::Quit => return Ok(true),
        }
    }
}

fn prompt_stage_action() -> Result<StageAction> {
    let items = [
        "Fill in",
        "Skip this stage",
        "Go back",
        "Preview prompt",
        "Quit",
    ];
    let choice = Select::new().items(&items).default(0).interact()?;

    Ok(match choice {
        0 => StageAction::Fill,
        1 => StageAction::Skip,
        2 => StageAction::Back,
        3 => StageAction::Preview,
        _ => StageAction::Quit,
    })
}

/// Final menu after the last stage: notes, preview, generate.
fn run_final_menu(wizard: &mut WizardState) -> Result<FinalAction> {
    loop {
        println!();
        let items = [
            "Preview prompt",
            "Add custom notes",
            "Generate strategy",
            "Back to stages",
            "Quit",
        ];
        let choice = Select::new().items(&items).default(2).interact()?;

        match choice {
            0 => print_preview(wizard),
            1 => {
                let notes: String = Input::new()
                    .with_prompt("Custom instructions for the model (blank to clear)")
                    .allow_empty(true)
                    .interact_text()?;
                let notes = notes.trim().to_string();
                wizard.set_custom_notes(if notes.is_empty() { None } else { Some(notes) });
            }
            2 => return Ok(FinalAction::Generate),
            3 => return Ok(FinalAction::BackToStages),
            _ => return Ok(FinalAction::Quit),
        }
    }
}

fn print_preview(wizard: &WizardState) {
    let prompt = compile(wizard, &wizard.model_target);
    println!();
    println!("  {}", style("--- compiled prompt ---").dim());
    println!("{prompt}");
    println!("  {}", style("--- end ---").dim());
}

async fn generate(state: &AppState, wizard: &WizardState) -> Result<()> {
    let generator = state
        .create_generator(&wizard.model_target)
        .context("Failed to build generation backend")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!(
        "Generating strategy via {}...",
        generator.provider_name()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = generator.generate(wizard).await;
    spinner.finish_and_clear();

    let result = result.context("Generation failed")?;

    println!();
    println!(
        "  {} Strategy generated by {} ({})",
        style("✓").green().bold(),
        generator.provider_name(),
        result.response.model
    );
    println!();
    println!("{}", result.response.content);
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// Per-stage prompts
// ---------------------------------------------------------------------------

fn prompt_stage_value(key: StageKey) -> Result<serde_json::Value> {
    let value = match key {
        StageKey::AssetSelection => serde_json::to_value(prompt_token()?)?,
        StageKey::StrategyTemplate => prompt_template()?,
        StageKey::Sentiment => serde_json::to_value(prompt_sentiment()?)?,
        StageKey::Research => prompt_research()?,
        StageKey::Parameters => serde_json::to_value(prompt_parameters()?)?,
        StageKey::Risk => serde_json::to_value(prompt_risk()?)?,
        StageKey::Swap => serde_json::to_value(prompt_swap()?)?,
    };
    Ok(value)
}

fn prompt_token() -> Result<TokenSelection> {
    let symbol: String = Input::new()
        .with_prompt("Token symbol (e.g. SOL)")
        .interact_text()?;
    let name = opt_string(
        Input::new()
            .with_prompt("Token name (optional)")
            .allow_empty(true)
            .interact_text()?,
    );
    let price_usd = opt_f64("Current price in USD (optional)")?;
    let change_24h_pct = opt_f64("24h change % (optional)")?;
    let market_cap_usd = opt_f64("Market cap in USD (optional)")?;

    Ok(TokenSelection {
        symbol: symbol.trim().to_uppercase(),
        name,
        price_usd,
        change_24h_pct,
        market_cap_usd,
    })
}

fn prompt_template() -> Result<serde_json::Value> {
    let catalog = template_catalog();
    let mut items: Vec<String> = catalog
        .iter()
        .map(|t| format!("{} ({}, {})", t.name, t.style, t.timeframe))
        .collect();
    items.push("Custom template...".to_string());

    let choice = Select::new().items(&items).default(0).interact()?;

    if choice < catalog.len() {
        return Ok(serde_json::to_value(&catalog[choice])?);
    }

    let name: String = Input::new().with_prompt("Template name").interact_text()?;
    let style_desc: String = Input::new()
        .with_prompt("Style (e.g. momentum, mean-reversion)")
        .interact_text()?;
    let timeframe: String = Input::new()
        .with_prompt("Timeframe (e.g. 4h, 1d)")
        .interact_text()?;
    let entry: String = Input::new()
        .with_prompt("Entry rules (semicolon-separated)")
        .allow_empty(true)
        .interact_text()?;
    let exit: String = Input::new()
        .with_prompt("Exit rules (semicolon-separated)")
        .allow_empty(true)
        .interact_text()?;

    Ok(serde_json::json!({
        "name": name,
        "style": style_desc,
        "timeframe": timeframe,
        "entry_rules": split_list(&entry),
        "exit_rules": split_list(&exit),
    }))
}

fn prompt_sentiment() -> Result<SentimentSnapshot> {
    let overall_score: f64 = Input::new()
        .with_prompt("Overall sentiment score (-1.0 to 1.0)")
        .interact_text()?;
    let classification: String = Input::new()
        .with_prompt("Classification (e.g. bullish, bearish, neutral)")
        .interact_text()?;
    let topics: String = Input::new()
        .with_prompt("Trending topics (semicolon-separated, optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(SentimentSnapshot {
        overall_score,
        classification,
        social_volume: None,
        news_score: None,
        trending_topics: split_list(&topics),
    })
}

fn prompt_research() -> Result<serde_json::Value> {
    let title: String = Input::new().with_prompt("Research title").interact_text()?;
    let summary: String = Input::new().with_prompt("Summary").interact_text()?;
    let source = opt_string(
        Input::new()
            .with_prompt("Source (optional)")
            .allow_empty(true)
            .interact_text()?,
    );
    let findings: String = Input::new()
        .with_prompt("Key findings (semicolon-separated, optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(serde_json::json!({
        "title": title,
        "source": source,
        "summary": summary,
        "key_findings": split_list(&findings),
    }))
}

fn prompt_parameters() -> Result<StrategyParameters> {
    let initial_capital_usd: f64 = Input::new()
        .with_prompt("Initial capital (USD)")
        .interact_text()?;
    let position_size_pct: f64 = Input::new()
        .with_prompt("Position size (% of capital)")
        .interact_text()?;
    let stop_loss_pct: f64 = Input::new().with_prompt("Stop loss (%)").interact_text()?;
    let take_profit_pct: f64 = Input::new()
        .with_prompt("Take profit (%)")
        .interact_text()?;
    let leverage = opt_f64("Leverage (optional)")?;

    Ok(StrategyParameters {
        initial_capital_usd,
        position_size_pct,
        leverage,
        stop_loss_pct,
        take_profit_pct,
    })
}

fn prompt_risk() -> Result<RiskSettings> {
    let max_drawdown_pct = opt_f64("Max drawdown % (optional)")?;
    let daily_loss_limit_usd = opt_f64("Daily loss limit USD (optional)")?;
    let risk_per_trade_pct = opt_f64("Risk per trade % (optional)")?;
    let trailing_stop = Some(
        Confirm::new()
            .with_prompt("Enable trailing stop?")
            .default(false)
            .interact()?,
    );

    Ok(RiskSettings {
        max_drawdown_pct,
        daily_loss_limit_usd,
        risk_per_trade_pct,
        trailing_stop,
    })
}

fn prompt_swap() -> Result<SwapSettings> {
    let enabled = Confirm::new()
        .with_prompt("Enable automatic stablecoin swaps?")
        .default(false)
        .interact()?;

    if !enabled {
        return Ok(SwapSettings {
            enabled: Some(false),
            stablecoin: None,
            slippage_pct: None,
            auto_convert_threshold_pct: None,
        });
    }

    let stablecoin = opt_string(
        Input::new()
            .with_prompt("Stablecoin (e.g. USDC)")
            .allow_empty(true)
            .interact_text()?,
    );
    let slippage_pct = opt_f64("Max slippage % (optional)")?;
    let auto_convert_threshold_pct = opt_f64("Auto-convert threshold % (optional)")?;

    Ok(SwapSettings {
        enabled: Some(true),
        stablecoin,
        slippage_pct,
        auto_convert_threshold_pct,
    })
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn opt_string(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn opt_f64(prompt: &str) -> Result<Option<f64>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .with_context(|| format!("'{trimmed}' is not a number"))?;
    Ok(Some(value))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
