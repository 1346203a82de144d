use market_risk_core::interest_rate_models::short_rate::{forecast_short_rate, VasicekInput};
use market_risk_core::interest_rate_models::term_structure::{
    analyze_yield_curve, CurveShape, YieldCurveInput,
};
use market_risk_core::math::{ln, sqrt};
use market_risk_core::AnalyticsError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn base_vasicek() -> VasicekInput {
    VasicekInput {
        current_rate: dec!(0.0427),
        mean_reversion_speed: dec!(0.25),
        long_term_rate: dec!(0.035),
        volatility: dec!(0.01),
    }
}

// ---------------------------------------------------------------------------
// Vasicek
// ---------------------------------------------------------------------------

#[test]
fn test_ten_year_expectation_near_long_run_mean() {
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    let ten_year = out
        .expected_path
        .iter()
        .find(|p| p.tenor_years == dec!(10))
        .unwrap();
    assert!(
        (ten_year.expected_rate - dec!(0.035)).abs() < dec!(0.001),
        "E[r(10)] = {} not within 0.1pp of 3.5%",
        ten_year.expected_rate
    );
    assert_eq!(ten_year.label, "10Y");
}

#[test]
fn test_path_converges_monotonically_to_theta() {
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    let gaps: Vec<Decimal> = out
        .expected_path
        .iter()
        .map(|p| (p.expected_rate - dec!(0.035)).abs())
        .collect();
    for w in gaps.windows(2) {
        assert!(w[1] < w[0], "gap to theta grew: {} -> {}", w[0], w[1]);
    }
}

#[test]
fn test_stdev_bounded_by_stationary_level() {
    // sqrt(sigma^2 / 2 kappa) = sqrt(0.0002)
    let stationary = sqrt(dec!(0.0002));
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    let mut last = Decimal::ZERO;
    for p in &out.expected_path {
        assert!(p.rate_stdev > last);
        assert!(p.rate_stdev < stationary);
        last = p.rate_stdev;
    }
}

#[test]
fn test_zero_coupon_prices_fall_with_maturity() {
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    let prices: Vec<Decimal> = out.zero_coupon.iter().map(|z| z.price).collect();
    assert_eq!(prices.len(), 4);
    for w in prices.windows(2) {
        assert!(w[1] < w[0]);
    }
    for z in &out.zero_coupon {
        assert!(z.price > Decimal::ZERO && z.price < Decimal::ONE);
    }
}

#[test]
fn test_half_life() {
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    assert_eq!(out.half_life_years, ln(dec!(2)) / dec!(0.25));
    assert!((out.half_life_years - dec!(2.7726)).abs() < dec!(0.0001));
}

#[test]
fn test_scenarios_and_probabilities() {
    let out = forecast_short_rate(&base_vasicek()).unwrap().result;
    let names: Vec<&str> = out.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["base", "up_1std", "down_1std"]);
    let total: Decimal = out.scenarios.iter().map(|s| s.probability).sum();
    assert_eq!(total, Decimal::ONE);
}

#[test]
fn test_non_positive_kappa_is_precondition_violation() {
    for kappa in [Decimal::ZERO, dec!(-0.1)] {
        let input = VasicekInput {
            mean_reversion_speed: kappa,
            ..base_vasicek()
        };
        match forecast_short_rate(&input).unwrap_err() {
            AnalyticsError::PreconditionViolation { field, .. } => {
                assert_eq!(field, "mean_reversion_speed")
            }
            other => panic!("Expected PreconditionViolation, got {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Yield curve
// ---------------------------------------------------------------------------

fn curve(pairs: &[(&str, Decimal)]) -> YieldCurveInput {
    YieldCurveInput {
        rates: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

#[test]
fn test_market_curve_forwards() {
    let out = analyze_yield_curve(&curve(&[
        ("3M", dec!(0.045)),
        ("2Y", dec!(0.0359)),
        ("10Y", dec!(0.0427)),
        ("30Y", dec!(0.045)),
    ]))
    .unwrap()
    .result;
    let labels: Vec<&str> = out.forward_rates.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["3M-2Y", "2Y-10Y", "10Y-30Y"]);
    // (0.0427*10 - 0.0359*2) / 8 = 0.0444
    assert_eq!(out.forward_rates[1].rate, dec!(0.0444));
    assert_eq!(out.curve_shape, CurveShape::Flat);
}

#[test]
fn test_steep_curve() {
    let out = analyze_yield_curve(&curve(&[("1M", dec!(0.01)), ("30Y", dec!(0.04))]))
        .unwrap()
        .result;
    assert_eq!(out.curve_shape, CurveShape::Steep);
    assert_eq!(out.slope_bps, dec!(300.0));
    assert_eq!(
        out.interpretation,
        "Economic expansion expected; favours growth equities"
    );
}

#[test]
fn test_empty_curve_is_insufficient() {
    let err = analyze_yield_curve(&curve(&[])).unwrap_err();
    assert!(matches!(err, AnalyticsError::InsufficientData(_)));
}
