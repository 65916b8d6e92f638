//! Per-stage strategy data bags.
//!
//! Each struct here is the value bag one wizard stage accumulates. The core
//! never validates the internal shape beyond the fields its renderers read;
//! absent optional fields simply render nothing. The `risk` and `swap`
//! stages are composite (all fields optional) because the stage registry
//! shallow-merges updates into them; every other stage is replaced whole.

use serde::{Deserialize, Serialize};

/// The asset the strategy trades (stage `asset-selection`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSelection {
    /// Ticker symbol, e.g. "SOL".
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_usd: Option<f64>,
}

/// A traditional-strategy template record (stage `strategy-template`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyTemplate {
    pub name: String,
    /// Broad style label, e.g. "trend-following" or "mean-reversion".
    pub style: String,
    pub timeframe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate_pct: Option<f64>,
    #[serde(default)]
    pub entry_rules: Vec<String>,
    #[serde(default)]
    pub exit_rules: Vec<String>,
}

/// A sentiment-analysis result (stage `sentiment`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    /// Normalized score in -1.0..=1.0.
    pub overall_score: f64,
    /// Human label, e.g. "bullish" / "neutral" / "bearish".
    pub classification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_score: Option<f64>,
    #[serde(default)]
    pub trending_topics: Vec<String>,
}

/// A research-document summary (stage `research`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
}

/// Numeric strategy parameters (stage `parameters`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub initial_capital_usd: f64,
    pub position_size_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

/// Risk-management thresholds (stage `risk`, composite: shallow-merged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drawdown_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_loss_limit_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_per_trade_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_stop: Option<bool>,
}

impl RiskSettings {
    /// Whether any threshold has been entered at all.
    pub fn is_empty(&self) -> bool {
        self.max_drawdown_pct.is_none()
            && self.daily_loss_limit_usd.is_none()
            && self.risk_per_trade_pct.is_none()
            && self.trailing_stop.is_none()
    }
}

/// Auto-swap settings (stage `swap`, composite: shallow-merged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stablecoin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_convert_threshold_pct: Option<f64>,
}

impl SwapSettings {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.stablecoin.is_none()
            && self.slippage_pct.is_none()
            && self.auto_convert_threshold_pct.is_none()
    }
}

/// Accumulated per-stage data for one wizard session.
///
/// One optional slot per stage. Slots are only written by explicit user
/// edits; navigation and skip/un-skip never clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<StrategyTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StrategyParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_bags_report_empty_until_any_field_is_set() {
        assert!(RiskSettings::default().is_empty());
        assert!(SwapSettings::default().is_empty());

        let risk = RiskSettings {
            max_drawdown_pct: Some(15.0),
            ..Default::default()
        };
        assert!(!risk.is_empty());

        let swap = SwapSettings {
            stablecoin: Some("USDC".to_string()),
            ..Default::default()
        };
        assert!(!swap.is_empty());
    }

    #[test]
    fn draft_serializes_without_unset_slots() {
        let draft = StrategyDraft {
            token: Some(TokenSelection {
                symbol: "SOL".to_string(),
                name: None,
                price_usd: None,
                change_24h_pct: None,
                market_cap_usd: None,
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("risk").is_none());
        assert!(json.get("swap").is_none());
    }
}
