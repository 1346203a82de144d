//! Vasicek short rate model.
//!
//! dr = kappa * (theta - r) dt + sigma dW
//!
//! Produces the expected-rate path and its dispersion at a fixed tenor grid,
//! closed-form zero-coupon prices and yields, a three-point rate scenario set,
//! and the mean-reversion half-life. All mathematics uses
//! `rust_decimal::Decimal`; percent fields are rounded for presentation only.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::{exp, ln, sqrt, to_pct};
use crate::types::{with_metadata, ComputationOutput, Rate, Years};
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PATH_TENORS: [Decimal; 7] = [
    dec!(0.25),
    dec!(0.5),
    dec!(1),
    dec!(2),
    dec!(3),
    dec!(5),
    dec!(10),
];

const ZERO_COUPON_MATURITIES: [Decimal; 4] = [dec!(1), dec!(2), dec!(5), dec!(10)];

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Input for the Vasicek short rate model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VasicekInput {
    /// Current short rate (r0)
    pub current_rate: Rate,
    /// Speed of mean reversion (kappa), must be > 0
    pub mean_reversion_speed: Decimal,
    /// Long-term mean rate (theta)
    pub long_term_rate: Rate,
    /// Instantaneous volatility (sigma), must be >= 0
    pub volatility: Rate,
}

/// Parameters echoed in percent (kappa stays raw).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VasicekParameters {
    pub r0_pct: Decimal,
    pub kappa: Decimal,
    pub theta_pct: Decimal,
    pub sigma_pct: Decimal,
}

/// E[r(t)] and its standard deviation at one tenor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePathPoint {
    pub label: String,
    pub tenor_years: Years,
    pub expected_rate: Rate,
    pub rate_stdev: Rate,
    pub expected_rate_pct: Decimal,
    pub rate_stdev_pct: Decimal,
}

/// Closed-form zero-coupon bond price P(0,T) and its continuously
/// compounded yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroCouponPoint {
    pub label: String,
    pub maturity: Years,
    pub price: Decimal,
    pub yield_rate: Rate,
    pub yield_pct: Decimal,
}

/// A named short-rate scenario with its assigned probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateScenario {
    pub name: String,
    pub rate: Rate,
    pub rate_pct: Decimal,
    pub probability: Decimal,
}

/// Output of the Vasicek forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VasicekOutput {
    pub model: String,
    pub parameters: VasicekParameters,
    pub expected_path: Vec<RatePathPoint>,
    pub zero_coupon: Vec<ZeroCouponPoint>,
    pub scenarios: Vec<RateScenario>,
    /// ln(2) / kappa
    pub half_life_years: Years,
    pub long_term_rate_pct: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Forecast the short rate under Vasicek dynamics.
///
/// Rejects `kappa <= 0` with a precondition error rather than dividing by zero.
pub fn forecast_short_rate(
    input: &VasicekInput,
) -> AnalyticsResult<ComputationOutput<VasicekOutput>> {
    let start = Instant::now();
    validate_vasicek(input)?;

    let expected_path = PATH_TENORS
        .iter()
        .map(|&t| {
            let mean = expected_rate(input, t);
            let stdev = sqrt(rate_variance(input, t)?);
            Ok(RatePathPoint {
                label: tenor_label(t),
                tenor_years: t,
                expected_rate: mean,
                rate_stdev: stdev,
                expected_rate_pct: to_pct(mean, 3),
                rate_stdev_pct: to_pct(stdev, 3),
            })
        })
        .collect::<AnalyticsResult<Vec<_>>>()?;

    let zero_coupon = ZERO_COUPON_MATURITIES
        .iter()
        .map(|&t| {
            let price = zero_coupon_price(input, t)?;
            let yield_rate = -ln(price) / t;
            Ok(ZeroCouponPoint {
                label: tenor_label(t),
                maturity: t,
                price,
                yield_rate,
                yield_pct: to_pct(yield_rate, 3),
            })
        })
        .collect::<AnalyticsResult<Vec<_>>>()?;

    let r0 = input.current_rate;
    let sigma = input.volatility;
    let scenarios = vec![
        scenario("base", r0, dec!(0.5)),
        scenario("up_1std", r0 + sigma, dec!(0.25)),
        scenario("down_1std", r0 - sigma, dec!(0.25)),
    ];

    let half_life_years = kappa_scaled(ln(dec!(2)).checked_div(input.mean_reversion_speed))?;

    let output = VasicekOutput {
        model: "Vasicek".into(),
        parameters: VasicekParameters {
            r0_pct: to_pct(r0, 3),
            kappa: input.mean_reversion_speed,
            theta_pct: to_pct(input.long_term_rate, 3),
            sigma_pct: to_pct(sigma, 3),
        },
        expected_path,
        zero_coupon,
        scenarios,
        half_life_years,
        long_term_rate_pct: to_pct(input.long_term_rate, 3),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "dynamics": "dr = kappa(theta - r)dt + sigma dW",
        "path_tenors": PATH_TENORS.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        "zero_coupon_pricing": "closed-form A(T) exp(-B(T) r0)",
        "scenario_probabilities": { "base": "0.5", "up_1std": "0.25", "down_1std": "0.25" },
    });

    Ok(with_metadata(
        "Vasicek Mean-Reverting Gaussian Model",
        &assumptions,
        vec![],
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Vasicek implementation
// ---------------------------------------------------------------------------

fn validate_vasicek(input: &VasicekInput) -> AnalyticsResult<()> {
    if input.mean_reversion_speed <= Decimal::ZERO {
        return Err(AnalyticsError::PreconditionViolation {
            field: "mean_reversion_speed".into(),
            reason: "kappa must be strictly positive".into(),
        });
    }
    if input.volatility < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "volatility".into(),
            reason: "Volatility cannot be negative".into(),
        });
    }
    Ok(())
}

/// E[r(t)] = r0 * exp(-kappa t) + theta * (1 - exp(-kappa t))
fn expected_rate(input: &VasicekInput, t: Years) -> Rate {
    let decay = exp(-input.mean_reversion_speed * t);
    input.current_rate * decay + input.long_term_rate * (Decimal::ONE - decay)
}

/// A kappa that passes validation can still be too small for Decimal:
/// kappa^2 rounds to zero or a 1/kappa term overflows.
fn kappa_scaled(value: Option<Decimal>) -> AnalyticsResult<Decimal> {
    value.ok_or_else(|| AnalyticsError::PreconditionViolation {
        field: "mean_reversion_speed".into(),
        reason: "kappa too small for Decimal precision".into(),
    })
}

/// Var[r(t)] = (sigma^2 / 2 kappa)(1 - exp(-2 kappa t))
fn rate_variance(input: &VasicekInput, t: Years) -> AnalyticsResult<Decimal> {
    let kappa = input.mean_reversion_speed;
    let sigma_sq = input.volatility * input.volatility;
    let stationary = kappa_scaled(sigma_sq.checked_div(dec!(2) * kappa))?;
    kappa_scaled(stationary.checked_mul(Decimal::ONE - exp(dec!(-2) * kappa * t)))
}

/// P(0,T) = A(T) exp(-B(T) r0) with
/// B(T) = (1 - exp(-kappa T)) / kappa and
/// A(T) = exp[(theta - sigma^2 / 2kappa^2)(B(T) - T) - sigma^2 B(T)^2 / 4kappa]
fn zero_coupon_price(input: &VasicekInput, t: Years) -> AnalyticsResult<Decimal> {
    let kappa = input.mean_reversion_speed;
    let sigma_sq = input.volatility * input.volatility;
    let b_t = kappa_scaled((Decimal::ONE - exp(-kappa * t)).checked_div(kappa))?;
    let drift_adj = kappa_scaled(sigma_sq.checked_div(dec!(2) * kappa * kappa))?;
    let convexity = kappa_scaled(
        sigma_sq
            .checked_div(dec!(4) * kappa)
            .and_then(|c| c.checked_mul(b_t * b_t)),
    )?;
    let exponent = kappa_scaled((input.long_term_rate - drift_adj).checked_mul(b_t - t))? - convexity;
    let price = exp(exponent) * exp(-b_t * input.current_rate);
    if price <= Decimal::ZERO {
        return kappa_scaled(None);
    }
    Ok(price)
}

fn scenario(name: &str, rate: Rate, probability: Decimal) -> RateScenario {
    RateScenario {
        name: name.into(),
        rate,
        rate_pct: to_pct(rate, 2),
        probability,
    }
}

fn tenor_label(t: Years) -> String {
    format!("{}Y", t.normalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal, label: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "{label}: expected ~{expected}, got {actual} (diff {diff} > tolerance {tolerance})"
        );
    }

    fn standard_vasicek() -> VasicekInput {
        VasicekInput {
            current_rate: dec!(0.0427),
            mean_reversion_speed: dec!(0.25),
            long_term_rate: dec!(0.035),
            volatility: dec!(0.01),
        }
    }

    #[test]
    fn test_expected_rate_converges_to_long_term() {
        let input = standard_vasicek();
        assert_close(
            expected_rate(&input, dec!(200)),
            dec!(0.035),
            dec!(0.0000001),
            "E[r(t)] for large t",
        );
    }

    #[test]
    fn test_variance_converges_to_stationary() {
        // sigma^2 / 2 kappa = 0.0001 / 0.5 = 0.0002
        let input = standard_vasicek();
        assert_close(
            rate_variance(&input, dec!(200)).unwrap(),
            dec!(0.0002),
            dec!(0.0000000001),
            "Var[r(t)] for large t",
        );
    }

    #[test]
    fn test_ten_year_expected_rate_near_theta() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        let ten_year = out.expected_path.last().unwrap();
        assert_eq!(ten_year.label, "10Y");
        assert_close(ten_year.expected_rate, dec!(0.035), dec!(0.001), "10Y E[r]");
        assert_eq!(ten_year.expected_rate_pct, dec!(3.563));
    }

    #[test]
    fn test_half_life() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        assert_close(out.half_life_years, dec!(2.7726), dec!(0.0001), "half-life");
    }

    #[test]
    fn test_path_labels_and_order() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        let labels: Vec<&str> = out.expected_path.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["0.25Y", "0.5Y", "1Y", "2Y", "3Y", "5Y", "10Y"]);
    }

    #[test]
    fn test_stdev_grows_with_tenor() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        for w in out.expected_path.windows(2) {
            assert!(w[1].rate_stdev > w[0].rate_stdev);
        }
    }

    #[test]
    fn test_zero_coupon_price_decreasing_in_maturity() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        assert_eq!(out.zero_coupon.len(), 4);
        for w in out.zero_coupon.windows(2) {
            assert!(
                w[1].price < w[0].price,
                "P({}) = {} should be below P({}) = {}",
                w[1].label,
                w[1].price,
                w[0].label,
                w[0].price
            );
        }
        for zc in &out.zero_coupon {
            assert!(zc.price > Decimal::ZERO && zc.price < Decimal::ONE);
        }
    }

    #[test]
    fn test_zero_volatility_yield_matches_integrated_mean() {
        // sigma = 0: y(T) = theta + (r0 - theta) B(T) / T
        let input = VasicekInput {
            volatility: Decimal::ZERO,
            ..standard_vasicek()
        };
        let out = forecast_short_rate(&input).unwrap().result;
        let five = &out.zero_coupon[2];
        let b_t = (Decimal::ONE - exp(dec!(-1.25))) / dec!(0.25);
        let expected = dec!(0.035) + (dec!(0.0427) - dec!(0.035)) * b_t / dec!(5);
        assert_close(five.yield_rate, expected, dec!(0.0000001), "5Y yield, sigma = 0");
    }

    #[test]
    fn test_scenarios() {
        let out = forecast_short_rate(&standard_vasicek()).unwrap().result;
        assert_eq!(out.scenarios.len(), 3);
        assert_eq!(out.scenarios[0].rate_pct, dec!(4.27));
        assert_eq!(out.scenarios[1].rate_pct, dec!(5.27));
        assert_eq!(out.scenarios[2].rate_pct, dec!(3.27));
        let total: Decimal = out.scenarios.iter().map(|s| s.probability).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_zero_kappa_is_precondition_violation() {
        let input = VasicekInput {
            mean_reversion_speed: Decimal::ZERO,
            ..standard_vasicek()
        };
        match forecast_short_rate(&input).unwrap_err() {
            AnalyticsError::PreconditionViolation { field, .. } => {
                assert_eq!(field, "mean_reversion_speed");
            }
            other => panic!("Expected PreconditionViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_vanishing_kappa_is_precondition_violation() {
        let input = VasicekInput {
            mean_reversion_speed: dec!(0.000000000000001),
            ..standard_vasicek()
        };
        match forecast_short_rate(&input).unwrap_err() {
            AnalyticsError::PreconditionViolation { field, .. } => {
                assert_eq!(field, "mean_reversion_speed");
            }
            other => panic!("Expected PreconditionViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_slow_mean_reversion_still_prices() {
        let input = VasicekInput {
            mean_reversion_speed: dec!(0.001),
            ..standard_vasicek()
        };
        let out = forecast_short_rate(&input).unwrap().result;
        assert_eq!(out.zero_coupon.len(), 4);
        assert!(out.zero_coupon.iter().all(|z| z.price > Decimal::ZERO));
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let input = VasicekInput {
            volatility: dec!(-0.01),
            ..standard_vasicek()
        };
        assert!(matches!(
            forecast_short_rate(&input),
            Err(AnalyticsError::InvalidInput { .. })
        ));
    }
}
