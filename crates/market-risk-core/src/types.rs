use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Snapshot of the market observables the analytics consume.
///
/// Rates are decimal fractions; `vix` is the index level (annualised percent).
/// Optional fields fall back to the caller's `AnalysisConfig` defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// 2Y treasury yield (short-rate proxy)
    pub short_rate: Rate,
    /// 10Y treasury yield
    pub long_rate: Rate,
    /// 30Y treasury yield
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultra_long_rate: Option<Rate>,
    /// 3M bill yield
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_rate_3m: Option<Rate>,
    /// Equity implied-volatility index level (e.g. 18.0)
    pub vix: Decimal,
    /// Equity index level used as the option underlying
    pub equity_index_level: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
