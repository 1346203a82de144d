use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::portfolio::risk::{calculate_var, VarInput, VarReport};
use crate::portfolio::risk_score::{estimate_move_from_vix, score_risk, RiskProfile, RiskScore};
use crate::portfolio::sizing::{size_position, PositionPlan, PositionSizingInput};
use crate::types::*;
use crate::AnalyticsResult;

use super::comprehensive::{run_comprehensive_analysis, ComprehensiveReport};

/// Input for the full risk report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReportInput {
    pub market: MarketSnapshot,
    /// Bond-volatility index level; estimated from VIX when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_value: Option<Decimal>,
    pub portfolio_value: Money,
    /// Defaults to `AnalysisConfig::risk.var_confidence`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<Decimal>,
}

/// Downstream consumers read `risk_metrics.risk_level`,
/// `risk_metrics.risk_score` and `position_sizing.adjusted_allocation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub move_estimated: bool,
    pub risk_metrics: RiskScore,
    pub position_sizing: PositionPlan,
    pub var_analysis: VarReport,
    pub market_analysis: ComprehensiveReport,
}

/// Score the market, size a position, estimate VaR and attach the
/// comprehensive analysis.
pub fn run_risk_report(
    input: &RiskReportInput,
    config: &AnalysisConfig,
) -> AnalyticsResult<ComputationOutput<RiskReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let vix = input.market.vix;
    let (move_value, move_estimated) = match input.move_value {
        Some(value) => (value, false),
        None => {
            let estimate = estimate_move_from_vix(vix, config.risk.move_proxy_multiplier);
            tracing::warn!(%vix, %estimate, "MOVE not supplied; estimated from VIX");
            warnings.push(format!(
                "MOVE not supplied; estimated as VIX x {} = {estimate}",
                config.risk.move_proxy_multiplier
            ));
            (estimate, true)
        }
    };

    tracing::debug!(%move_value, %vix, portfolio_value = %input.portfolio_value, "risk report started");

    let scored = score_risk(&RiskProfile {
        move_value,
        vix_value: vix,
    })?;
    warnings.extend(scored.warnings.into_iter().map(|w| format!("risk_metrics: {w}")));
    let risk_metrics = scored.result;

    let sized = size_position(&PositionSizingInput {
        risk_score: risk_metrics.risk_score,
        portfolio_value: input.portfolio_value,
    })?;
    warnings.extend(sized.warnings.into_iter().map(|w| format!("position_sizing: {w}")));

    let var = calculate_var(&VarInput {
        portfolio_value: input.portfolio_value,
        vix,
        confidence_level: input
            .confidence_level
            .unwrap_or(config.risk.var_confidence),
        cvar_multiplier: config.risk.cvar_multiplier,
    })?;
    warnings.extend(var.warnings.into_iter().map(|w| format!("var_analysis: {w}")));

    let analysis = run_comprehensive_analysis(&input.market, config)?;
    warnings.extend(analysis.warnings);

    tracing::debug!(
        risk_level = ?risk_metrics.risk_level,
        risk_score = risk_metrics.risk_score,
        "risk report finished"
    );

    let report = RiskReport {
        as_of: input.market.as_of,
        move_estimated,
        risk_metrics,
        position_sizing: sized.result,
        var_analysis: var.result,
        market_analysis: analysis.result,
    };

    let assumptions = serde_json::json!({
        "move_proxy_multiplier": config.risk.move_proxy_multiplier.to_string(),
        "cvar_multiplier": config.risk.cvar_multiplier.to_string(),
        "var_volatility_source": "VIX",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Market Risk Report (score, sizing, VaR, comprehensive analysis)",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}
