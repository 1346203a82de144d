use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use market_risk_core::derivatives::options::{self, OptionInput, OptionType};
use market_risk_core::AnalysisConfig;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OptionKind {
    Call,
    Put,
}

impl From<OptionKind> for OptionType {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Call => OptionType::Call,
            OptionKind::Put => OptionType::Put,
        }
    }
}

/// Arguments for Black-Scholes option pricing
#[derive(Args)]
pub struct OptionPriceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Underlying price (defaults to the configured equity index level)
    #[arg(long)]
    pub spot: Option<Decimal>,

    /// Strike price (defaults to spot)
    #[arg(long)]
    pub strike: Option<Decimal>,

    /// Risk-free rate, decimal (defaults to the configured 10Y yield)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Volatility, decimal (defaults to configured VIX / 100)
    #[arg(long)]
    pub volatility: Option<Decimal>,

    /// Calendar days to expiry
    #[arg(long)]
    pub days: Option<u32>,

    /// Option type
    #[arg(long, value_enum, default_value = "call")]
    pub option_type: OptionKind,
}

pub fn run_option_price(
    args: OptionPriceArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let opt_input: OptionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        let spot = args.spot.unwrap_or(config.market.equity_index_level);
        OptionInput {
            spot_price: spot,
            strike_price: args.strike.unwrap_or(spot),
            risk_free_rate: args.rate.unwrap_or(config.market.ten_year_rate),
            volatility: args
                .volatility
                .unwrap_or(config.market.vix / Decimal::ONE_HUNDRED),
            maturity_days: args.days.unwrap_or(config.sample_option_days),
            option_type: args.option_type.into(),
        }
    };
    let result = options::price_option(&opt_input)?;
    Ok(serde_json::to_value(result)?)
}
