use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use market_risk_core::volatility_surface::implied_vol_surface::{self, VolSurfaceInput};
use market_risk_core::AnalysisConfig;

use crate::input;

/// Arguments for the implied volatility surface
#[derive(Args)]
pub struct VolSurfaceArgs {
    /// Path to JSON input file (may carry a quoted smile)
    #[arg(long)]
    pub input: Option<String>,

    /// ATM implied vol, decimal (defaults to configured VIX / 100)
    #[arg(long)]
    pub atm_vol: Option<Decimal>,

    /// Underlying level, echoed in the output
    #[arg(long)]
    pub spot: Option<Decimal>,
}

pub fn run_vol_surface(
    args: VolSurfaceArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let surface_input: VolSurfaceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        VolSurfaceInput {
            spot: args.spot,
            atm_volatility: args
                .atm_vol
                .unwrap_or(config.market.vix / Decimal::ONE_HUNDRED),
            smile: None,
        }
    };
    let result = implied_vol_surface::analyze_vol_surface(&surface_input)?;
    Ok(serde_json::to_value(result)?)
}
