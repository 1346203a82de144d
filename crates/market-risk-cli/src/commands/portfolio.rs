use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use market_risk_core::portfolio::risk::{self, VarInput};
use market_risk_core::portfolio::risk_score::{self, RiskProfile};
use market_risk_core::portfolio::sizing::{self, PositionSizingInput};
use market_risk_core::AnalysisConfig;

use crate::input;

/// Arguments for the MOVE/VIX risk score
#[derive(Args)]
pub struct RiskScoreArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// MOVE index level (estimated from VIX when omitted)
    #[arg(long = "move")]
    pub move_value: Option<Decimal>,

    /// VIX level
    #[arg(long)]
    pub vix: Option<Decimal>,
}

/// Arguments for risk-scaled position sizing
#[derive(Args)]
pub struct PositionSizeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Composite risk score (0 to 100)
    #[arg(long)]
    pub risk_score: Option<u32>,

    /// Portfolio value
    #[arg(long)]
    pub portfolio_value: Option<Decimal>,
}

/// Arguments for parametric VaR
#[derive(Args)]
pub struct VarArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Portfolio value
    #[arg(long)]
    pub portfolio_value: Option<Decimal>,

    /// VIX level (defaults to the configured VIX)
    #[arg(long)]
    pub vix: Option<Decimal>,

    /// Confidence level (0.90, 0.95 or 0.99)
    #[arg(long)]
    pub confidence: Option<Decimal>,
}

pub fn run_risk_score(
    args: RiskScoreArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: RiskProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        let vix = args.vix.unwrap_or(config.market.vix);
        let move_value = match args.move_value {
            Some(value) => value,
            None => {
                let estimate =
                    risk_score::estimate_move_from_vix(vix, config.risk.move_proxy_multiplier);
                tracing::warn!(%vix, %estimate, "--move not given; estimated from VIX");
                estimate
            }
        };
        RiskProfile {
            move_value,
            vix_value: vix,
        }
    };
    let result = risk_score::score_risk(&profile)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_position_size(args: PositionSizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sizing_input: PositionSizingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        PositionSizingInput {
            risk_score: args
                .risk_score
                .ok_or("--risk-score is required (or provide --input)")?,
            portfolio_value: args
                .portfolio_value
                .ok_or("--portfolio-value is required (or provide --input)")?,
        }
    };
    let result = sizing::size_position(&sizing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_var(args: VarArgs, config: &AnalysisConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let var_input: VarInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        VarInput {
            portfolio_value: args
                .portfolio_value
                .ok_or("--portfolio-value is required (or provide --input)")?,
            vix: args.vix.unwrap_or(config.market.vix),
            confidence_level: args.confidence.unwrap_or(config.risk.var_confidence),
            cvar_multiplier: config.risk.cvar_multiplier,
        }
    };
    let result = risk::calculate_var(&var_input)?;
    Ok(serde_json::to_value(result)?)
}
