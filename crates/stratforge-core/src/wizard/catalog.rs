//! Built-in traditional-strategy template catalog.
//!
//! The product ships a fixed catalog the user picks a base template from;
//! the selected record becomes the `strategy-template` stage's data bag
//! verbatim. Values here are descriptive seeds for the generation prompt,
//! not backtested figures.

use stratforge_types::strategy::StrategyTemplate;

/// The built-in template catalog, in presentation order.
pub fn template_catalog() -> Vec<StrategyTemplate> {
    vec![
        StrategyTemplate {
            name: "Golden Cross Momentum".to_string(),
            style: "trend-following".to_string(),
            timeframe: "4h".to_string(),
            win_rate_pct: Some(42.0),
            entry_rules: vec![
                "50 EMA crosses above 200 EMA".to_string(),
                "Volume above 20-period average".to_string(),
            ],
            exit_rules: vec![
                "50 EMA crosses back below 200 EMA".to_string(),
                "Trailing stop of 2x ATR hit".to_string(),
            ],
        },
        StrategyTemplate {
            name: "RSI Mean Reversion".to_string(),
            style: "mean-reversion".to_string(),
            timeframe: "1h".to_string(),
            win_rate_pct: Some(58.0),
            entry_rules: vec![
                "RSI(14) drops below 30".to_string(),
                "Price within 2% of a tested support level".to_string(),
            ],
            exit_rules: vec![
                "RSI(14) recovers above 50".to_string(),
                "Hard stop 3% below entry".to_string(),
            ],
        },
        StrategyTemplate {
            name: "Breakout Volume Surge".to_string(),
            style: "breakout".to_string(),
            timeframe: "15m".to_string(),
            win_rate_pct: Some(38.0),
            entry_rules: vec![
                "Close above 20-day high".to_string(),
                "Volume at least 3x its 20-period average".to_string(),
            ],
            exit_rules: vec![
                "Close back inside the prior range".to_string(),
                "Take profit at 2R".to_string(),
            ],
        },
        StrategyTemplate {
            name: "Grid Range Trader".to_string(),
            style: "market-neutral".to_string(),
            timeframe: "5m".to_string(),
            win_rate_pct: Some(65.0),
            entry_rules: vec![
                "Place buy orders at fixed intervals below mid-range".to_string(),
                "Only active while ADX(14) is below 20".to_string(),
            ],
            exit_rules: vec![
                "Sell each grid level one interval above its fill".to_string(),
                "Disable the grid on a range breakout".to_string(),
            ],
        },
        StrategyTemplate {
            name: "MACD Swing".to_string(),
            style: "swing".to_string(),
            timeframe: "1d".to_string(),
            win_rate_pct: Some(47.0),
            entry_rules: vec![
                "MACD line crosses above signal line below the zero axis".to_string(),
            ],
            exit_rules: vec![
                "MACD line crosses below signal line".to_string(),
                "Stop below the most recent swing low".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let catalog = template_catalog();
        let mut names: Vec<_> = catalog.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn every_template_has_entry_and_exit_rules() {
        for template in template_catalog() {
            assert!(!template.entry_rules.is_empty(), "{}", template.name);
            assert!(!template.exit_rules.is_empty(), "{}", template.name);
        }
    }
}
