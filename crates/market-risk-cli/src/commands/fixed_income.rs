use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use market_risk_core::fixed_income::bonds::{self, BondInput};
use market_risk_core::AnalysisConfig;

use crate::input;

/// Arguments for fixed-coupon bond analytics
#[derive(Args)]
pub struct BondArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Face (par) value
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Annual coupon rate, decimal
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Yield to maturity, decimal (defaults to the configured 10Y yield)
    #[arg(long)]
    pub ytm: Option<Decimal>,

    /// Years to maturity
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Coupon payments per year
    #[arg(long)]
    pub frequency: Option<u32>,
}

pub fn run_bond(args: BondArgs, config: &AnalysisConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: BondInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        let sample = &config.sample_bond;
        BondInput {
            face_value: args.face_value.unwrap_or(sample.face_value),
            coupon_rate: args.coupon_rate.unwrap_or(sample.coupon_rate),
            ytm: args.ytm.unwrap_or(config.market.ten_year_rate),
            years_to_maturity: args.years.unwrap_or(sample.years_to_maturity),
            payment_frequency: args.frequency.unwrap_or(sample.payment_frequency),
        }
    };
    let result = bonds::analyze_bond(&bond_input)?;
    Ok(serde_json::to_value(result)?)
}
