use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::{sqrt, to_pct};
use crate::types::*;
use crate::AnalyticsResult;

const TRADING_DAYS: Decimal = dec!(252);
const DEFAULT_Z: Decimal = dec!(1.645);

fn default_confidence() -> Decimal {
    dec!(0.95)
}

fn default_cvar_multiplier() -> Decimal {
    dec!(1.25)
}

/// Input for the parametric VaR estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarInput {
    pub portfolio_value: Money,
    /// VIX level, annualised percent
    pub vix: Decimal,
    #[serde(default = "default_confidence")]
    pub confidence_level: Decimal,
    /// CVaR = VaR x multiplier (normal-tail shortcut)
    #[serde(default = "default_cvar_multiplier")]
    pub cvar_multiplier: Decimal,
}

/// Output of the parametric VaR estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarReport {
    pub confidence_level: Decimal,
    pub z_score: Decimal,
    /// (vix / 100) / sqrt(252)
    pub daily_volatility: Rate,
    pub daily_volatility_pct: Decimal,
    pub var_1d: Money,
    pub var_5d: Money,
    pub var_20d: Money,
    pub cvar_1d: Money,
    pub interpretation: String,
}

/// Tabulated one-sided z-scores; anything else, including values outside
/// (0, 1) such as `95`, returns `None`.
fn z_score_for_confidence(confidence: Decimal) -> Option<Decimal> {
    if confidence == dec!(0.90) {
        Some(dec!(1.28))
    } else if confidence == dec!(0.95) {
        Some(dec!(1.645))
    } else if confidence == dec!(0.99) {
        Some(dec!(2.33))
    } else {
        None
    }
}

/// Whole units with comma grouping: 1865238.4 -> "1,865,238"
fn format_grouped(value: Decimal) -> String {
    let rounded = value.round_dp(0).to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

/// Parametric normal VaR from VIX-implied daily volatility, scaled to 5 and
/// 20 days by square root of time.
pub fn calculate_var(input: &VarInput) -> AnalyticsResult<ComputationOutput<VarReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.portfolio_value <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "portfolio_value".into(),
            reason: "Portfolio value must be positive".into(),
        });
    }
    if input.vix < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "vix".into(),
            reason: "VIX must be non-negative".into(),
        });
    }
    let z_score = match z_score_for_confidence(input.confidence_level) {
        Some(z) => z,
        None => {
            tracing::warn!(
                confidence = %input.confidence_level,
                "confidence level not tabulated; using 95% z-score"
            );
            warnings.push(format!(
                "Confidence {} not tabulated; using z = {DEFAULT_Z}",
                input.confidence_level
            ));
            DEFAULT_Z
        }
    };

    let daily_volatility = input.vix / dec!(100) / sqrt(TRADING_DAYS);
    let var_1d = input.portfolio_value * daily_volatility * z_score;
    let var_5d = var_1d * sqrt(dec!(5));
    let var_20d = var_1d * sqrt(dec!(20));
    let cvar_1d = var_1d * input.cvar_multiplier;

    let interpretation = format!(
        "{}% confidence: 1-day loss should not exceed {}",
        (input.confidence_level * dec!(100)).round_dp(1).normalize(),
        format_grouped(var_1d)
    );

    let output = VarReport {
        confidence_level: input.confidence_level,
        z_score,
        daily_volatility,
        daily_volatility_pct: to_pct(daily_volatility, 3),
        var_1d,
        var_5d,
        var_20d,
        cvar_1d,
        interpretation,
    };

    let assumptions = serde_json::json!({
        "distribution": "normal, zero mean",
        "daily_volatility": "VIX / 100 / sqrt(252)",
        "horizon_scaling": "square root of time",
        "cvar_multiplier": input.cvar_multiplier.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Parametric VaR (VIX-implied volatility)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
