use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use market_risk_core::interest_rate_models::short_rate::{self, VasicekInput};
use market_risk_core::interest_rate_models::term_structure::{self, YieldCurveInput};
use market_risk_core::AnalysisConfig;

use crate::input;

/// Arguments for the Vasicek short-rate forecast
#[derive(Args)]
pub struct RateModelArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current short rate r0 (defaults to the configured 10Y yield)
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Mean reversion speed (kappa)
    #[arg(long)]
    pub kappa: Option<Decimal>,

    /// Long-term mean rate (theta)
    #[arg(long)]
    pub theta: Option<Decimal>,

    /// Rate volatility (sigma)
    #[arg(long)]
    pub sigma: Option<Decimal>,
}

/// Arguments for yield curve classification
#[derive(Args)]
pub struct YieldCurveArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Tenor=yield pairs, e.g. "3M=0.045,2Y=0.0359,10Y=0.0427"
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub rates: Option<Vec<String>>,
}

pub fn run_rate_model(
    args: RateModelArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let vasicek_input: VasicekInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        VasicekInput {
            current_rate: args.current_rate.unwrap_or(config.market.ten_year_rate),
            mean_reversion_speed: args
                .kappa
                .unwrap_or(config.rate_model.mean_reversion_speed),
            long_term_rate: args.theta.unwrap_or(config.rate_model.long_term_rate),
            volatility: args.sigma.unwrap_or(config.rate_model.volatility),
        }
    };
    let result = short_rate::forecast_short_rate(&vasicek_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_yield_curve(
    args: YieldCurveArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let curve_input: YieldCurveInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else if let Some(ref pairs) = args.rates {
        YieldCurveInput {
            rates: parse_rate_pairs(pairs)?,
        }
    } else {
        YieldCurveInput {
            rates: configured_curve(config),
        }
    };
    let result = term_structure::analyze_yield_curve(&curve_input)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_rate_pairs(pairs: &[String]) -> Result<BTreeMap<String, Decimal>, Box<dyn std::error::Error>> {
    let mut rates = BTreeMap::new();
    for pair in pairs {
        let (tenor, rate) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected TENOR=RATE, got '{}'", pair))?;
        let rate: Decimal = rate
            .trim()
            .parse()
            .map_err(|e| format!("Invalid rate for {}: {}", tenor.trim(), e))?;
        rates.insert(tenor.trim().to_uppercase(), rate);
    }
    Ok(rates)
}

fn configured_curve(config: &AnalysisConfig) -> BTreeMap<String, Decimal> {
    let market = &config.market;
    [
        ("3M", market.bill_rate_3m),
        ("2Y", market.two_year_rate),
        ("10Y", market.ten_year_rate),
        ("30Y", market.thirty_year_rate),
    ]
    .into_iter()
    .map(|(tenor, rate)| (tenor.to_string(), rate))
    .collect()
}
