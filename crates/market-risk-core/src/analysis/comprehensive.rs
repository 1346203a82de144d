//! Comprehensive market analysis: one snapshot in, every analytics area out.
//!
//! The 10Y yield drives the rate model, the sample bond and the sample
//! option; the VIX level (as a decimal vol) drives the surface and the
//! option. Values the snapshot does not carry come from `AnalysisConfig`.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::derivatives::options::{price_option, OptionInput, OptionOutput, OptionType};
use crate::fixed_income::bonds::{analyze_bond, BondInput, BondOutput};
use crate::interest_rate_models::short_rate::{forecast_short_rate, VasicekInput, VasicekOutput};
use crate::interest_rate_models::term_structure::{
    analyze_yield_curve, YieldCurveInput, YieldCurveOutput,
};
use crate::types::*;
use crate::volatility_surface::implied_vol_surface::{
    analyze_vol_surface, VolSurfaceInput, VolSurfaceOutput,
};
use crate::AnalyticsResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub market: MarketSnapshot,
    pub rate_model: VasicekOutput,
    pub yield_curve: YieldCurveOutput,
    pub volatility: VolSurfaceOutput,
    pub bond: BondOutput,
    pub option: OptionOutput,
}

/// Append a component's warnings under its section name.
fn absorb<T: Serialize>(
    section: &str,
    output: ComputationOutput<T>,
    warnings: &mut Vec<String>,
) -> T {
    warnings.extend(output.warnings.into_iter().map(|w| format!("{section}: {w}")));
    output.result
}

/// Always four tenors: the snapshot's 2Y and 10Y plus 3M and 30Y, taken from
/// config when the snapshot omits them.
fn curve_points(snapshot: &MarketSnapshot, config: &AnalysisConfig) -> BTreeMap<String, Rate> {
    let mut rates = BTreeMap::new();
    rates.insert(
        "3M".to_string(),
        snapshot.bill_rate_3m.unwrap_or(config.market.bill_rate_3m),
    );
    rates.insert("2Y".to_string(), snapshot.short_rate);
    rates.insert("10Y".to_string(), snapshot.long_rate);
    rates.insert(
        "30Y".to_string(),
        snapshot
            .ultra_long_rate
            .unwrap_or(config.market.thirty_year_rate),
    );
    rates
}

/// Run the rate model, yield curve, vol surface, sample bond and sample
/// option over one market snapshot.
pub fn run_comprehensive_analysis(
    snapshot: &MarketSnapshot,
    config: &AnalysisConfig,
) -> AnalyticsResult<ComputationOutput<ComprehensiveReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let r0 = snapshot.long_rate;
    let atm_vol = snapshot.vix / dec!(100);
    let spot = snapshot.equity_index_level;

    tracing::debug!(%r0, vix = %snapshot.vix, %spot, "comprehensive analysis started");

    let rate_model = absorb(
        "rate_model",
        forecast_short_rate(&VasicekInput {
            current_rate: r0,
            mean_reversion_speed: config.rate_model.mean_reversion_speed,
            long_term_rate: config.rate_model.long_term_rate,
            volatility: config.rate_model.volatility,
        })?,
        &mut warnings,
    );

    let yield_curve = absorb(
        "yield_curve",
        analyze_yield_curve(&YieldCurveInput {
            rates: curve_points(snapshot, config),
        })?,
        &mut warnings,
    );

    let volatility = absorb(
        "volatility",
        analyze_vol_surface(&VolSurfaceInput {
            spot: Some(spot),
            atm_volatility: atm_vol,
            smile: None,
        })?,
        &mut warnings,
    );

    let bond = absorb(
        "bond",
        analyze_bond(&BondInput {
            face_value: config.sample_bond.face_value,
            coupon_rate: config.sample_bond.coupon_rate,
            ytm: r0,
            years_to_maturity: config.sample_bond.years_to_maturity,
            payment_frequency: config.sample_bond.payment_frequency,
        })?,
        &mut warnings,
    );

    let option = absorb(
        "option",
        price_option(&OptionInput {
            spot_price: spot,
            strike_price: spot,
            risk_free_rate: r0,
            volatility: atm_vol,
            maturity_days: config.sample_option_days,
            option_type: OptionType::Call,
        })?,
        &mut warnings,
    );

    tracing::debug!(
        curve_shape = ?yield_curve.curve_shape,
        warnings = warnings.len(),
        "comprehensive analysis finished"
    );

    let report = ComprehensiveReport {
        as_of: snapshot.as_of,
        market: snapshot.clone(),
        rate_model,
        yield_curve,
        volatility,
        bond,
        option,
    };

    let assumptions = serde_json::json!({
        "rate_model_r0": "10Y yield",
        "kappa": config.rate_model.mean_reversion_speed.to_string(),
        "theta": config.rate_model.long_term_rate.to_string(),
        "sigma": config.rate_model.volatility.to_string(),
        "atm_volatility": "VIX / 100",
        "sample_bond_ytm": "10Y yield",
        "sample_option": format!("ATM call, {} days", config.sample_option_days),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Comprehensive Market Analysis",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

/// Snapshot built entirely from config defaults.
pub fn default_snapshot(config: &AnalysisConfig) -> MarketSnapshot {
    MarketSnapshot {
        short_rate: config.market.two_year_rate,
        long_rate: config.market.ten_year_rate,
        ultra_long_rate: Some(config.market.thirty_year_rate),
        bill_rate_3m: Some(config.market.bill_rate_3m),
        vix: config.market.vix,
        equity_index_level: config.market.equity_index_level,
        as_of: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivatives::options::Moneyness;
    use crate::error::AnalyticsError;
    use crate::interest_rate_models::term_structure::CurveShape;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_snapshot_report() {
        let config = AnalysisConfig::default();
        let result = run_comprehensive_analysis(&default_snapshot(&config), &config).unwrap();
        let report = &result.result;

        // 3M 4.5% -> 30Y 4.5%: zero slope
        assert_eq!(report.yield_curve.curve_shape, CurveShape::Flat);
        assert_eq!(report.option.moneyness, Moneyness::AtTheMoney);
        assert_eq!(report.volatility.atm_volatility, dec!(0.18));
        assert_eq!(report.bond.inputs.periods, 20);
        assert_eq!(report.rate_model.parameters.r0_pct, dec!(4.270));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_optional_rates_use_config() {
        let config = AnalysisConfig::default();
        let snapshot = MarketSnapshot {
            short_rate: dec!(0.03),
            long_rate: dec!(0.045),
            ultra_long_rate: None,
            bill_rate_3m: None,
            vix: dec!(22),
            equity_index_level: dec!(5000),
            as_of: None,
        };
        let report = run_comprehensive_analysis(&snapshot, &config).unwrap().result;
        assert_eq!(report.yield_curve.data_points, 4);
        assert_eq!(report.yield_curve.short_rate, dec!(0.045));
        assert_eq!(report.yield_curve.long_rate, dec!(0.045));
    }

    #[test]
    fn test_invalid_snapshot_propagates() {
        let config = AnalysisConfig::default();
        let snapshot = MarketSnapshot {
            equity_index_level: Decimal::ZERO,
            ..default_snapshot(&config)
        };
        let err = run_comprehensive_analysis(&snapshot, &config).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput { .. }));
    }

    #[test]
    fn test_yield_curve_section_serializes_flat() {
        let config = AnalysisConfig::default();
        let report = run_comprehensive_analysis(&default_snapshot(&config), &config)
            .unwrap()
            .result;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["yield_curve"]["curve_shape"], "FLAT");
        assert_eq!(json["yield_curve"]["data_points"], 4);
        assert!(json["yield_curve"].get("status").is_none());
    }

    #[test]
    fn test_snapshot_rates_override_config_tenors() {
        let config = AnalysisConfig::default();
        let snapshot = MarketSnapshot {
            bill_rate_3m: Some(dec!(0.052)),
            ultra_long_rate: Some(dec!(0.047)),
            ..default_snapshot(&config)
        };
        let curve = curve_points(&snapshot, &config);
        assert_eq!(curve.len(), 4);
        assert_eq!(curve["3M"], dec!(0.052));
        assert_eq!(curve["30Y"], dec!(0.047));

        let report = run_comprehensive_analysis(&snapshot, &config).unwrap().result;
        assert_eq!(report.yield_curve.short_rate, dec!(0.052));
        assert_eq!(report.yield_curve.long_rate, dec!(0.047));
    }
}
