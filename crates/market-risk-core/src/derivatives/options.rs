use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::{exp, ln, norm_cdf, norm_pdf, sqrt, to_pct};
use crate::types::*;
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Moneyness {
    #[serde(rename = "ITM")]
    InTheMoney,
    #[serde(rename = "ATM")]
    AtTheMoney,
    #[serde(rename = "OTM")]
    OutOfTheMoney,
}

/// How the price was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRegime {
    /// Closed-form Black-Scholes
    Analytic,
    /// Zero time to expiry: payoff only
    ExpiryIntrinsic,
    /// Zero volatility: discounted forward payoff
    ZeroVolatility,
}

/// European option on a non-dividend-paying underlying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInput {
    pub spot_price: Money,
    pub strike_price: Money,
    pub risk_free_rate: Rate,
    pub volatility: Rate,
    /// Calendar days to expiry (ACT/365)
    pub maturity_days: u32,
    pub option_type: OptionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: Decimal,
    pub gamma: Decimal,
    /// Per calendar day
    pub theta: Decimal,
    /// Per 1 percentage point of volatility
    pub vega: Decimal,
    /// Per 1 percentage point of rate
    pub rho: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInputsEcho {
    pub spot: Money,
    pub strike: Money,
    pub rate_pct: Decimal,
    pub volatility_pct: Decimal,
    pub maturity_days: u32,
    pub option_type: OptionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionOutput {
    pub model: String,
    pub inputs: OptionInputsEcho,
    pub regime: PricingRegime,
    pub time_to_expiry: Decimal,
    pub price: Money,
    pub greeks: OptionGreeks,
    pub moneyness: Moneyness,
    pub intrinsic_value: Money,
    pub time_value: Money,
    pub breakeven: Money,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_pricing_input(input: &OptionInput) -> AnalyticsResult<()> {
    if input.spot_price <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "spot_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.strike_price <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "strike_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.volatility < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "volatility".into(),
            reason: "must be non-negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Black-Scholes internals
// ---------------------------------------------------------------------------

/// Below this total volatility d1 leaves Decimal's range; the option is
/// valued as if sigma were zero.
const MIN_SIGMA_SQRT_T: Decimal = dec!(0.0000000001);

struct BsParams {
    d1: Decimal,
    d2: Decimal,
    sqrt_t: Decimal,
    exp_neg_rt: Decimal,
}

/// d1/d2 are undefined when sigma * sqrt(t) is (effectively) zero; that case is reported
/// as `NumericDegeneracy` for the caller to resolve.
fn compute_bs_params(
    s: Decimal,
    k: Decimal,
    t: Decimal,
    r: Decimal,
    sigma: Decimal,
) -> AnalyticsResult<BsParams> {
    let sqrt_t = sqrt(t);
    let sigma_sqrt_t = sigma * sqrt_t;
    if sigma_sqrt_t < MIN_SIGMA_SQRT_T {
        return Err(AnalyticsError::NumericDegeneracy {
            context: format!(
                "Black-Scholes d1: sigma * sqrt(t) below {MIN_SIGMA_SQRT_T} (sigma={sigma}, t={t})"
            ),
        });
    }
    let d1 = (ln(s / k) + (r + sigma * sigma / dec!(2)) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    Ok(BsParams {
        d1,
        d2,
        sqrt_t,
        exp_neg_rt: exp(-r * t),
    })
}

fn bs_price(s: Decimal, k: Decimal, params: &BsParams, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => s * norm_cdf(params.d1) - k * params.exp_neg_rt * norm_cdf(params.d2),
        OptionType::Put => k * params.exp_neg_rt * norm_cdf(-params.d2) - s * norm_cdf(-params.d1),
    }
}

fn compute_greeks(
    s: Decimal,
    k: Decimal,
    r: Decimal,
    t: Decimal,
    params: &BsParams,
    option_type: OptionType,
) -> OptionGreeks {
    let nd1 = norm_pdf(params.d1);
    let sigma_sqrt_t = params.d1 - params.d2;

    let delta = match option_type {
        OptionType::Call => norm_cdf(params.d1),
        OptionType::Put => norm_cdf(params.d1) - Decimal::ONE,
    };

    // gamma = n(d1) / (S * sigma * sqrt(T))
    let gamma = nd1 / (s * sigma_sqrt_t);

    // -S n(d1) sigma / (2 sqrt(T)) == -S n(d1) (sigma sqrt(T)) / (2T)
    let decay = -s * nd1 * sigma_sqrt_t / (dec!(2) * t);
    let theta_annual = match option_type {
        OptionType::Call => decay - r * k * params.exp_neg_rt * norm_cdf(params.d2),
        OptionType::Put => decay + r * k * params.exp_neg_rt * norm_cdf(-params.d2),
    };
    let theta = theta_annual / dec!(365);

    let vega = s * nd1 * params.sqrt_t / dec!(100);

    let rho = match option_type {
        OptionType::Call => k * t * params.exp_neg_rt * norm_cdf(params.d2) / dec!(100),
        OptionType::Put => -k * t * params.exp_neg_rt * norm_cdf(-params.d2) / dec!(100),
    };

    OptionGreeks {
        delta,
        gamma,
        theta,
        vega,
        rho,
    }
}

/// Price and greeks when sigma * sqrt(t) = 0: the option is worth its
/// (discounted) payoff and only the exercise indicator remains.
fn degenerate_valuation(
    s: Decimal,
    k: Decimal,
    r: Decimal,
    t: Decimal,
    option_type: OptionType,
) -> (Decimal, OptionGreeks, PricingRegime) {
    let discounted_strike = k * exp(-r * t);
    // Probability-one exercise indicator for the call; 1/2 exactly at the kink
    let call_exercise = if s > discounted_strike {
        Decimal::ONE
    } else if s < discounted_strike {
        Decimal::ZERO
    } else {
        dec!(0.5)
    };

    let price = match option_type {
        OptionType::Call => (s - discounted_strike).max(Decimal::ZERO),
        OptionType::Put => (discounted_strike - s).max(Decimal::ZERO),
    };
    let delta = match option_type {
        OptionType::Call => call_exercise,
        OptionType::Put => call_exercise - Decimal::ONE,
    };

    if t.is_zero() {
        let greeks = OptionGreeks {
            delta,
            gamma: Decimal::ZERO,
            theta: Decimal::ZERO,
            vega: Decimal::ZERO,
            rho: Decimal::ZERO,
        };
        return (price, greeks, PricingRegime::ExpiryIntrinsic);
    }

    let put_exercise = Decimal::ONE - call_exercise;
    let (theta_annual, rho) = match option_type {
        OptionType::Call => (
            -r * discounted_strike * call_exercise,
            t * discounted_strike * call_exercise / dec!(100),
        ),
        OptionType::Put => (
            r * discounted_strike * put_exercise,
            -t * discounted_strike * put_exercise / dec!(100),
        ),
    };
    let greeks = OptionGreeks {
        delta,
        gamma: Decimal::ZERO,
        theta: theta_annual / dec!(365),
        vega: Decimal::ZERO,
        rho,
    };
    (price, greeks, PricingRegime::ZeroVolatility)
}

// ---------------------------------------------------------------------------
// Moneyness and intrinsic value helpers
// ---------------------------------------------------------------------------

fn classify_moneyness(s: Decimal, k: Decimal, option_type: OptionType) -> Moneyness {
    let (itm, otm) = match option_type {
        OptionType::Call => (s > k, s < k),
        OptionType::Put => (s < k, s > k),
    };
    if itm {
        Moneyness::InTheMoney
    } else if otm {
        Moneyness::OutOfTheMoney
    } else {
        Moneyness::AtTheMoney
    }
}

fn intrinsic_value(s: Decimal, k: Decimal, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => (s - k).max(Decimal::ZERO),
        OptionType::Put => (k - s).max(Decimal::ZERO),
    }
}

fn breakeven(k: Decimal, premium: Decimal, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => k + premium,
        OptionType::Put => k - premium,
    }
}

// ---------------------------------------------------------------------------
// Public API: price_option
// ---------------------------------------------------------------------------

/// Price a European option with Black-Scholes-Merton (no dividends) and
/// report its greeks, moneyness, intrinsic/time value and breakeven.
pub fn price_option(input: &OptionInput) -> AnalyticsResult<ComputationOutput<OptionOutput>> {
    let start = Instant::now();
    validate_pricing_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let s = input.spot_price;
    let k = input.strike_price;
    let r = input.risk_free_rate;
    let sigma = input.volatility;
    let t = Decimal::from(input.maturity_days) / dec!(365);

    let (price, greeks, regime) = match compute_bs_params(s, k, t, r, sigma) {
        Ok(params) => (
            bs_price(s, k, &params, input.option_type),
            compute_greeks(s, k, r, t, &params, input.option_type),
            PricingRegime::Analytic,
        ),
        Err(AnalyticsError::NumericDegeneracy { context }) => {
            tracing::warn!(%context, "option priced without time value");
            let resolved = degenerate_valuation(s, k, r, t, input.option_type);
            warnings.push(match resolved.2 {
                PricingRegime::ExpiryIntrinsic => {
                    "Option at expiry: priced at intrinsic value".to_string()
                }
                _ => "Zero volatility: priced at discounted forward intrinsic value".to_string(),
            });
            resolved
        }
        Err(e) => return Err(e),
    };

    let iv = intrinsic_value(s, k, input.option_type);
    let output = OptionOutput {
        model: "Black-Scholes".into(),
        inputs: OptionInputsEcho {
            spot: s,
            strike: k,
            rate_pct: to_pct(r, 2),
            volatility_pct: to_pct(sigma, 2),
            maturity_days: input.maturity_days,
            option_type: input.option_type,
        },
        regime,
        time_to_expiry: t,
        price,
        greeks,
        moneyness: classify_moneyness(s, k, input.option_type),
        intrinsic_value: iv,
        time_value: price - iv,
        breakeven: breakeven(k, price, input.option_type),
    };

    let assumptions = serde_json::json!({
        "model": "Black-Scholes-Merton (European, no dividends)",
        "day_count": "ACT/365",
        "risk_free_rate": r.to_string(),
        "volatility": sigma.to_string(),
        "theta_unit": "per calendar day",
        "vega_rho_unit": "per 1 percentage point",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Black-Scholes (closed-form)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
