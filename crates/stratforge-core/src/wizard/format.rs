//! Numeric formatting for compiled prompt sections.
//!
//! Percentages render with one decimal; currency-like magnitudes are
//! abbreviated to K/M. Kept as pure functions so the compiler stays
//! deterministic and the formats are testable in isolation.

/// Format a percentage with one decimal, e.g. `12.5%`.
pub fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format a signed percentage, e.g. `+3.2%` / `-1.4%`.
pub fn signed_pct(value: f64) -> String {
    format!("{value:+.1}%")
}

/// Format a USD amount, abbreviating thousands and millions.
///
/// `1_460_000.0` -> `$1.5M`, `12_300.0` -> `$12.3K`, `142.5` -> `$142.50`.
pub fn usd(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${value:.2}")
    }
}

/// Format a leverage multiplier, e.g. `3x`.
pub fn leverage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}x")
    } else {
        format!("{value:.1}x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_uses_one_decimal() {
        assert_eq!(pct(12.5), "12.5%");
        assert_eq!(pct(3.0), "3.0%");
        assert_eq!(pct(0.25), "0.2%");
    }

    #[test]
    fn signed_pct_carries_the_sign() {
        assert_eq!(signed_pct(3.2), "+3.2%");
        assert_eq!(signed_pct(-1.4), "-1.4%");
        assert_eq!(signed_pct(0.0), "+0.0%");
    }

    #[test]
    fn usd_abbreviates_thousands_and_millions() {
        assert_eq!(usd(1_460_000.0), "$1.5M");
        // 1.45 is not exactly representable; the stored value is just
        // below the midpoint and rounds down.
        assert_eq!(usd(1_450_000.0), "$1.4M");
        assert_eq!(usd(65_000_000.0), "$65.0M");
        assert_eq!(usd(12_300.0), "$12.3K");
        assert_eq!(usd(142.5), "$142.50");
        assert_eq!(usd(999.99), "$999.99");
        assert_eq!(usd(1_000.0), "$1.0K");
    }

    #[test]
    fn leverage_drops_trailing_zero_fraction() {
        assert_eq!(leverage(3.0), "3x");
        assert_eq!(leverage(1.5), "1.5x");
    }
}
