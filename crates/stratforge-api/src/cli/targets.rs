//! `sforge targets` -- list supported model targets.

use anyhow::Result;
use console::style;

use stratforge_infra::config;
use stratforge_types::wizard::ModelTarget;

use crate::state::AppState;

/// Print the supported targets and the model each one resolves to.
pub async fn list_targets(state: &AppState) -> Result<()> {
    let targets = ModelTarget::builtin();

    println!();
    println!("  {} Supported model targets:", style("*").cyan().bold());
    println!();

    for target in &targets {
        let model = config::resolve_model(&state.config, target);
        let marker = if *target == state.config.default_target {
            style("(default)").dim().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<10} {} {}",
            style(target.to_string()).yellow(),
            model,
            marker
        );
    }

    println!();
    println!(
        "  {}",
        style("Any other name is passed through as a custom OpenAI-compatible model.").dim()
    );
    println!();

    Ok(())
}
