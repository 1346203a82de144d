//! Decimal transcendental helpers shared by every analytics module.
//!
//! Everything stays in `rust_decimal::Decimal`: exp via range-reduced Taylor
//! series, ln and sqrt via Newton iteration, and the standard normal CDF via
//! the Abramowitz & Stegun 26.2.17 polynomial.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TAYLOR_EXP_TERMS: u32 = 40;
const NEWTON_MAX_ITERATIONS: u32 = 100;
const CONVERGENCE_EPS: Decimal = dec!(0.0000000000000000000001);

/// e^x. Returns zero below -60 and saturates above 60.
pub fn exp(x: Decimal) -> Decimal {
    if x.is_zero() {
        return Decimal::ONE;
    }
    if x < dec!(-60) {
        return Decimal::ZERO;
    }
    if x > dec!(60) {
        return Decimal::MAX;
    }

    // exp(-x) = 1/exp(x) keeps the series free of alternating signs
    if x < Decimal::ZERO {
        let pos = exp_positive(-x);
        if pos.is_zero() {
            return Decimal::MAX;
        }
        return Decimal::ONE / pos;
    }

    exp_positive(x)
}

fn exp_positive(x: Decimal) -> Decimal {
    debug_assert!(x >= Decimal::ZERO);

    // exp(x) = exp(x/2)^2 until the argument is small enough for the series
    if x > Decimal::ONE {
        let half = exp_positive(x / dec!(2));
        return half.checked_mul(half).unwrap_or(Decimal::MAX);
    }

    let mut sum = Decimal::ONE;
    let mut term = Decimal::ONE;
    for k in 1..=TAYLOR_EXP_TERMS {
        term = term * x / Decimal::from(k);
        sum += term;
        if term < dec!(0.0000000000000000000000000001) {
            break;
        }
    }
    sum
}

/// Natural logarithm via Newton's method on exp(y) = x.
///
/// Non-positive input is outside the domain; callers validate before calling.
/// Returns zero in that case.
pub fn ln(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO || x == Decimal::ONE {
        return Decimal::ZERO;
    }

    // Seed with the integer power of e, then the linear remainder
    let e_approx = dec!(2.718281828459045235360287471);
    let mut whole = Decimal::ZERO;
    let mut v = x;
    while v > e_approx {
        v /= e_approx;
        whole += Decimal::ONE;
    }
    while v < Decimal::ONE / e_approx {
        v *= e_approx;
        whole -= Decimal::ONE;
    }
    let mut y = whole + (v - Decimal::ONE);

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let ey = exp(y);
        if ey.is_zero() {
            break;
        }
        // y_{n+1} = y_n - (exp(y_n) - x) / exp(y_n)
        let next = y - Decimal::ONE + x / ey;
        let step = (next - y).abs();
        y = next;
        if step < CONVERGENCE_EPS {
            break;
        }
    }
    y
}

/// Square root via Newton's method. Non-positive input returns zero.
pub fn sqrt(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if x == Decimal::ONE {
        return Decimal::ONE;
    }

    let mut guess = if x > Decimal::ONE { x / dec!(2) } else { Decimal::ONE };
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let next = (guess + x / guess) / dec!(2);
        let step = (next - guess).abs();
        guess = next;
        if step < CONVERGENCE_EPS {
            break;
        }
    }
    guess
}

/// |x| beyond which phi(x) underflows to zero and Phi(x) is 0 or 1.
const NORMAL_TAIL_CUTOFF: Decimal = dec!(40);

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn norm_pdf(x: Decimal) -> Decimal {
    if x.abs() > NORMAL_TAIL_CUTOFF {
        return Decimal::ZERO;
    }
    let sqrt_two_pi = dec!(2.506628274631000502415765285);
    exp(-(x * x) / dec!(2)) / sqrt_two_pi
}

/// Standard normal CDF (Abramowitz & Stegun 26.2.17, |error| < 7.5e-8).
/// For x < 0: Phi(x) = 1 - Phi(-x)
pub fn norm_cdf(x: Decimal) -> Decimal {
    let b1 = dec!(0.319381530);
    let b2 = dec!(-0.356563782);
    let b3 = dec!(1.781477937);
    let b4 = dec!(-1.821255978);
    let b5 = dec!(1.330274429);
    let p = dec!(0.2316419);

    let abs_x = x.abs();
    if abs_x > NORMAL_TAIL_CUTOFF {
        return if x < Decimal::ZERO {
            Decimal::ZERO
        } else {
            Decimal::ONE
        };
    }
    let t = Decimal::ONE / (Decimal::ONE + p * abs_x);
    let poly = t * (b1 + t * (b2 + t * (b3 + t * (b4 + t * b5))));
    let cdf_pos = Decimal::ONE - norm_pdf(abs_x) * poly;

    if x < Decimal::ZERO {
        Decimal::ONE - cdf_pos
    } else {
        cdf_pos
    }
}

/// Express a decimal fraction in percent, rounded to `dp` places.
pub fn to_pct(x: Decimal, dp: u32) -> Decimal {
    (x * dec!(100)).round_dp(dp)
}
