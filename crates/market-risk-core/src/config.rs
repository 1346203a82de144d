//! Caller-supplied defaults for the composite analyses.
//!
//! Nothing here is read from the environment: the CLI (or any other host)
//! deserializes an `AnalysisConfig` and passes it in.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, Years};

/// Vasicek parameters applied to the 10Y rate in the comprehensive analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateModelDefaults {
    pub mean_reversion_speed: Decimal,
    pub long_term_rate: Rate,
    pub volatility: Rate,
}

impl Default for RateModelDefaults {
    fn default() -> Self {
        Self {
            mean_reversion_speed: dec!(0.25),
            long_term_rate: dec!(0.035),
            volatility: dec!(0.01),
        }
    }
}

/// Fallback market levels for values a snapshot does not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDefaults {
    pub bill_rate_3m: Rate,
    pub two_year_rate: Rate,
    pub ten_year_rate: Rate,
    pub thirty_year_rate: Rate,
    pub vix: Decimal,
    pub equity_index_level: Money,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            bill_rate_3m: dec!(0.045),
            two_year_rate: dec!(0.0359),
            ten_year_rate: dec!(0.0427),
            thirty_year_rate: dec!(0.045),
            vix: dec!(18),
            equity_index_level: dec!(2650),
        }
    }
}

/// The sample bond priced off the 10Y yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleBond {
    pub face_value: Money,
    pub coupon_rate: Rate,
    pub years_to_maturity: Years,
    pub payment_frequency: u32,
}

impl Default for SampleBond {
    fn default() -> Self {
        Self {
            face_value: dec!(10000),
            coupon_rate: dec!(0.04),
            years_to_maturity: dec!(10),
            payment_frequency: 2,
        }
    }
}

/// Heuristic constants for the risk layer. None of these has a statistical
/// derivation; they are kept tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskDefaults {
    pub var_confidence: Decimal,
    /// CVaR = VaR x multiplier
    pub cvar_multiplier: Decimal,
    /// MOVE estimate = VIX x multiplier
    pub move_proxy_multiplier: Decimal,
}

impl Default for RiskDefaults {
    fn default() -> Self {
        Self {
            var_confidence: dec!(0.95),
            cvar_multiplier: dec!(1.25),
            move_proxy_multiplier: dec!(5.5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rate_model: RateModelDefaults,
    pub market: MarketDefaults,
    pub sample_bond: SampleBond,
    /// Calendar days to expiry of the at-the-money sample call
    pub sample_option_days: u32,
    pub risk: RiskDefaults,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rate_model: RateModelDefaults::default(),
            market: MarketDefaults::default(),
            sample_bond: SampleBond::default(),
            sample_option_days: 30,
            risk: RiskDefaults::default(),
        }
    }
}
