use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use market_risk_core::analysis::comprehensive::{self, default_snapshot};
use market_risk_core::analysis::risk_report::{self, RiskReportInput};
use market_risk_core::{AnalysisConfig, MarketSnapshot};

use crate::input;

/// Arguments for the comprehensive market analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON market snapshot (config defaults when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full risk report
#[derive(Args)]
pub struct RiskReportArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Portfolio value
    #[arg(long)]
    pub portfolio_value: Option<Decimal>,

    /// MOVE index level (estimated from VIX when omitted)
    #[arg(long = "move")]
    pub move_value: Option<Decimal>,

    /// VaR confidence level
    #[arg(long)]
    pub confidence: Option<Decimal>,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: MarketSnapshot = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        tracing::debug!("no snapshot supplied; using configured market levels");
        default_snapshot(config)
    };
    let result = comprehensive::run_comprehensive_analysis(&snapshot, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risk_report(
    args: RiskReportArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input: RiskReportInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        RiskReportInput {
            market: default_snapshot(config),
            move_value: args.move_value,
            portfolio_value: args
                .portfolio_value
                .ok_or("--portfolio-value is required (or provide --input)")?,
            confidence_level: args.confidence,
        }
    };
    let result = risk_report::run_risk_report(&report_input, config)?;
    Ok(serde_json::to_value(result)?)
}
