use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::to_pct;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::AnalyticsResult;

/// Parallel yield shocks in basis points.
const SHOCKS_BPS: [i32; 4] = [-100, -50, 50, 100];

/// |price - face| below this fraction of face counts as par.
const PAR_TOLERANCE: Decimal = dec!(0.000000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Plain fixed-rate bullet bond, valued on a coupon date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    pub face_value: Money,
    /// Annual coupon rate as a decimal (0.04 = 4%)
    pub coupon_rate: Rate,
    /// Annual yield to maturity as a decimal
    pub ytm: Rate,
    pub years_to_maturity: Years,
    /// Coupon periods per year
    pub payment_frequency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumDiscount {
    Premium,
    Discount,
    Par,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInputsEcho {
    pub face_value: Money,
    pub coupon_rate_pct: Decimal,
    pub ytm_pct: Decimal,
    pub years_to_maturity: Years,
    pub payment_frequency: u32,
    /// floor(years_to_maturity * payment_frequency)
    pub periods: u32,
}

/// Result of one parallel yield shock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateShock {
    pub yield_change: Rate,
    /// Duration + convexity estimate: price * (1 + pct_change)
    pub new_price: Money,
    /// -D_mod * dy + 0.5 * C * dy^2, decimal fraction
    pub pct_change: Decimal,
    pub pct_change_pct: Decimal,
    /// Full repricing at the shocked yield; `None` when the shocked periodic
    /// yield is at or below -100%
    pub repriced: Option<Money>,
    /// new_price - repriced
    pub approximation_error: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondOutput {
    pub inputs: BondInputsEcho,
    pub price: Money,
    pub premium_discount: PremiumDiscount,
    /// Annual coupon / price
    pub current_yield: Rate,
    pub current_yield_pct: Decimal,
    /// Years
    pub macaulay_duration: Decimal,
    pub modified_duration: Decimal,
    pub convexity: Decimal,
    /// Keyed by signed shock in basis points
    pub rate_shock_table: BTreeMap<i32, RateShock>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a bullet bond and report duration, convexity and the parallel
/// shock table.
///
/// Discount factors are accumulated by repeated multiplication rather than
/// `powd()`.
pub fn analyze_bond(input: &BondInput) -> AnalyticsResult<ComputationOutput<BondOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let freq = Decimal::from(input.payment_frequency);
    let periods = total_periods(input)?;
    let coupon = input.face_value * input.coupon_rate / freq;
    let y = input.ytm / freq;

    let price = price_bond(coupon, input.face_value, y, periods)?;
    let macaulay_duration = compute_macaulay(coupon, input.face_value, y, periods, freq, price)?;
    let modified_duration = macaulay_duration / (Decimal::ONE + y);
    let convexity = compute_convexity(coupon, input.face_value, y, periods, freq, price)?;

    let mut rate_shock_table = BTreeMap::new();
    for bps in SHOCKS_BPS {
        let dy = Decimal::from(bps) / dec!(10000);
        let pct_change = -modified_duration * dy + dec!(0.5) * convexity * dy * dy;
        let new_price = price * (Decimal::ONE + pct_change);
        let repriced = match price_bond(coupon, input.face_value, (input.ytm + dy) / freq, periods)
        {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(bps, error = %e, "shocked yield cannot be repriced");
                warnings.push(format!("{bps} bp shock not repriced: {e}"));
                None
            }
        };
        rate_shock_table.insert(
            bps,
            RateShock {
                yield_change: dy,
                new_price,
                pct_change,
                pct_change_pct: to_pct(pct_change, 2),
                repriced,
                approximation_error: repriced.map(|p| new_price - p),
            },
        );
    }

    let current_yield = coupon * freq / price;

    let output = BondOutput {
        inputs: BondInputsEcho {
            face_value: input.face_value,
            coupon_rate_pct: to_pct(input.coupon_rate, 3),
            ytm_pct: to_pct(input.ytm, 3),
            years_to_maturity: input.years_to_maturity,
            payment_frequency: input.payment_frequency,
            periods,
        },
        price,
        premium_discount: classify_premium_discount(price, input.face_value),
        current_yield,
        current_yield_pct: to_pct(current_yield, 3),
        macaulay_duration,
        modified_duration,
        convexity,
        rate_shock_table,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "payment_frequency": input.payment_frequency,
        "periods": "floor(years_to_maturity * payment_frequency)",
        "settlement": "assumed on coupon date (no accrued interest)",
        "shock_estimate": "-D_mod * dy + 0.5 * C * dy^2",
        "shocks_bps": SHOCKS_BPS,
    });

    Ok(with_metadata(
        "Bond Price, Duration & Convexity (discrete coupon schedule)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &BondInput) -> AnalyticsResult<()> {
    if input.face_value <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "face_value".into(),
            reason: "Face value must be positive.".into(),
        });
    }
    if input.coupon_rate < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "coupon_rate".into(),
            reason: "Coupon rate must be non-negative.".into(),
        });
    }
    if input.payment_frequency == 0 {
        return Err(AnalyticsError::InvalidInput {
            field: "payment_frequency".into(),
            reason: "Payment frequency must be at least 1.".into(),
        });
    }
    if input.years_to_maturity <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "Years to maturity must be positive.".into(),
        });
    }
    if input.ytm / Decimal::from(input.payment_frequency) <= dec!(-1) {
        return Err(AnalyticsError::InvalidInput {
            field: "ytm".into(),
            reason: "Periodic yield must be greater than -100%.".into(),
        });
    }
    Ok(())
}

fn total_periods(input: &BondInput) -> AnalyticsResult<u32> {
    let periods = (input.years_to_maturity * Decimal::from(input.payment_frequency))
        .floor()
        .to_u32()
        .unwrap_or(0);
    if periods == 0 {
        return Err(AnalyticsError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "Maturity must cover at least one coupon period.".into(),
        });
    }
    Ok(periods)
}

fn cash_flow(t: u32, periods: u32, coupon: Money, face_value: Money) -> Money {
    if t == periods {
        coupon + face_value
    } else {
        coupon
    }
}

/// PV = sum_{t=1..n} coupon / (1+y)^t + face / (1+y)^n
fn price_bond(coupon: Money, face_value: Money, y: Rate, periods: u32) -> AnalyticsResult<Money> {
    let one_plus_y = Decimal::ONE + y;
    if one_plus_y <= Decimal::ZERO {
        return Err(AnalyticsError::DivisionByZero {
            context: "bond pricing: (1 + periodic yield) is not positive".to_string(),
        });
    }

    let mut price = Decimal::ZERO;
    let mut df = Decimal::ONE;
    for t in 1..=periods {
        df *= one_plus_y;
        price += cash_flow(t, periods, coupon, face_value) / df;
    }
    Ok(price)
}

/// sum_t t * PV(CF_t) / price / freq
fn compute_macaulay(
    coupon: Money,
    face_value: Money,
    y: Rate,
    periods: u32,
    freq: Decimal,
    price: Money,
) -> AnalyticsResult<Decimal> {
    if price.is_zero() {
        return Err(AnalyticsError::DivisionByZero {
            context: "Macaulay duration: bond price is zero".to_string(),
        });
    }

    let one_plus_y = Decimal::ONE + y;
    let mut weighted = Decimal::ZERO;
    let mut df = Decimal::ONE;
    for t in 1..=periods {
        df *= one_plus_y;
        weighted += Decimal::from(t) * cash_flow(t, periods, coupon, face_value) / df;
    }
    Ok(weighted / price / freq)
}

/// sum_t t(t+1) * CF_t / (1+y)^(t+2) / (price * freq^2)
fn compute_convexity(
    coupon: Money,
    face_value: Money,
    y: Rate,
    periods: u32,
    freq: Decimal,
    price: Money,
) -> AnalyticsResult<Decimal> {
    let denominator = price * freq * freq;
    if denominator.is_zero() {
        return Err(AnalyticsError::DivisionByZero {
            context: "convexity: bond price is zero".to_string(),
        });
    }

    let one_plus_y = Decimal::ONE + y;
    let mut numerator = Decimal::ZERO;
    // (1+y)^2 head start so df tracks (1+y)^(t+2)
    let mut df = one_plus_y * one_plus_y;
    for t in 1..=periods {
        df *= one_plus_y;
        let t_dec = Decimal::from(t);
        numerator += t_dec * (t_dec + Decimal::ONE) * cash_flow(t, periods, coupon, face_value) / df;
    }
    Ok(numerator / denominator)
}

fn classify_premium_discount(price: Money, face_value: Money) -> PremiumDiscount {
    let diff = price - face_value;
    if diff.abs() <= face_value * PAR_TOLERANCE {
        PremiumDiscount::Par
    } else if diff > Decimal::ZERO {
        PremiumDiscount::Premium
    } else {
        PremiumDiscount::Discount
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
