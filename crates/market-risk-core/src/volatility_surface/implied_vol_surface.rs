use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::to_pct;
use crate::types::*;
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PUT_10D: &str = "10D_Put";
pub const PUT_25D: &str = "25D_Put";
pub const ATM: &str = "ATM";
pub const CALL_25D: &str = "25D_Call";
pub const CALL_10D: &str = "10D_Call";

/// Smile synthesized from ATM when none is supplied, wing to wing.
const SMILE_RATIOS: [(&str, Decimal); 5] = [
    (PUT_10D, dec!(1.30)),
    (PUT_25D, dec!(1.15)),
    (ATM, dec!(1.00)),
    (CALL_25D, dec!(0.95)),
    (CALL_10D, dec!(0.90)),
];

const TERM_RATIOS: [(&str, Decimal); 5] = [
    ("1W", dec!(1.10)),
    ("1M", dec!(1.00)),
    ("3M", dec!(0.95)),
    ("6M", dec!(0.92)),
    ("1Y", dec!(0.90)),
];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolSurfaceInput {
    /// Underlying level, echoed only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot: Option<Money>,
    /// At-the-money implied vol as a decimal (0.18 = 18%)
    pub atm_volatility: Rate,
    /// Delta-bucket label -> implied vol. Synthesized from ATM when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<BTreeMap<String, Rate>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmileSource {
    Synthesized,
    Supplied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmilePoint {
    pub label: String,
    pub volatility: Rate,
    pub volatility_pct: Decimal,
}

/// Skew metrics; the `_pct` fields are in vol points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewMetrics {
    /// 25D put vol - 25D call vol
    pub skew: Decimal,
    pub risk_reversal: Decimal,
    /// avg(25D put, 25D call) - ATM
    pub butterfly: Decimal,
    pub skew_pct: Decimal,
    pub risk_reversal_pct: Decimal,
    pub butterfly_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewSignal {
    DownsideStress,
    DownsideHedging,
    Balanced,
    UpsideDemand,
}

impl SkewSignal {
    pub fn from_skew(skew: Decimal) -> Self {
        if skew > dec!(0.03) {
            SkewSignal::DownsideStress
        } else if skew > dec!(0.01) {
            SkewSignal::DownsideHedging
        } else if skew > dec!(-0.01) {
            SkewSignal::Balanced
        } else {
            SkewSignal::UpsideDemand
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            SkewSignal::DownsideStress => "Strong downside risk premium; market stress signal",
            SkewSignal::DownsideHedging => "Normal downside hedging demand",
            SkewSignal::Balanced => "Balanced volatility structure",
            SkewSignal::UpsideDemand => "Upside expectations; rising call demand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermShape {
    Contango,
    Backwardation,
}

impl TermShape {
    pub fn interpretation(self) -> &'static str {
        match self {
            TermShape::Backwardation => "Elevated near-term uncertainty; event risk",
            TermShape::Contango => "Normal volatility term structure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermStructurePoint {
    pub tenor: String,
    pub volatility: Rate,
    pub volatility_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolSurfaceOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot: Option<Money>,
    pub smile_source: SmileSource,
    pub atm_volatility: Rate,
    pub atm_volatility_pct: Decimal,
    pub smile: Vec<SmilePoint>,
    pub skew_metrics: SkewMetrics,
    pub skew_signal: SkewSignal,
    pub skew_interpretation: String,
    pub term_structure: Vec<TermStructurePoint>,
    pub term_shape: TermShape,
    pub term_interpretation: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &VolSurfaceInput) -> AnalyticsResult<()> {
    if input.atm_volatility < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "atm_volatility".into(),
            reason: "must be non-negative".into(),
        });
    }
    if let Some(smile) = &input.smile {
        if let Some((label, _)) = smile.iter().find(|(_, v)| **v < Decimal::ZERO) {
            return Err(AnalyticsError::InvalidInput {
                field: format!("smile.{label}"),
                reason: "must be non-negative".into(),
            });
        }
    }
    Ok(())
}

fn synthesize_smile(atm: Rate) -> Vec<(String, Rate)> {
    SMILE_RATIOS
        .iter()
        .map(|(label, ratio)| (label.to_string(), atm * ratio))
        .collect()
}

/// Canonical buckets first, wing to wing, then any extra labels in key order.
fn order_supplied_smile(smile: &BTreeMap<String, Rate>) -> Vec<(String, Rate)> {
    let canonical = SMILE_RATIOS.iter().filter_map(|(label, _)| {
        smile.get(*label).map(|v| (label.to_string(), *v))
    });
    let extras = smile
        .iter()
        .filter(|(label, _)| !SMILE_RATIOS.iter().any(|(c, _)| *c == label.as_str()))
        .map(|(label, v)| (label.clone(), *v));
    canonical.chain(extras).collect()
}

fn lookup_or_fallback(
    smile: &[(String, Rate)],
    label: &str,
    fallback: Rate,
    warnings: &mut Vec<String>,
) -> Rate {
    match smile.iter().find(|(l, _)| l == label) {
        Some((_, v)) => *v,
        None => {
            tracing::warn!(label, "smile point missing; using ATM volatility");
            warnings.push(format!("Smile has no '{label}' point; ATM volatility used"));
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarize the smile (skew, risk reversal, butterfly) and a short-tenor
/// term structure scaled from the ATM vol.
pub fn analyze_vol_surface(
    input: &VolSurfaceInput,
) -> AnalyticsResult<ComputationOutput<VolSurfaceOutput>> {
    let start = Instant::now();
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let (smile_source, smile) = match &input.smile {
        Some(points) if !points.is_empty() => (SmileSource::Supplied, order_supplied_smile(points)),
        _ => (SmileSource::Synthesized, synthesize_smile(input.atm_volatility)),
    };

    let atm_vol = lookup_or_fallback(&smile, ATM, input.atm_volatility, &mut warnings);
    let put_vol = lookup_or_fallback(&smile, PUT_25D, atm_vol, &mut warnings);
    let call_vol = lookup_or_fallback(&smile, CALL_25D, atm_vol, &mut warnings);

    let skew = put_vol - call_vol;
    let risk_reversal = -skew;
    let butterfly = (put_vol + call_vol) / dec!(2) - atm_vol;
    let skew_signal = SkewSignal::from_skew(skew);

    let term_structure: Vec<TermStructurePoint> = TERM_RATIOS
        .iter()
        .map(|(tenor, ratio)| {
            let volatility = atm_vol * ratio;
            TermStructurePoint {
                tenor: tenor.to_string(),
                volatility,
                volatility_pct: to_pct(volatility, 2),
            }
        })
        .collect();
    // 1W against 1M
    let term_shape = if term_structure[0].volatility > term_structure[1].volatility {
        TermShape::Backwardation
    } else {
        TermShape::Contango
    };

    let output = VolSurfaceOutput {
        spot: input.spot,
        smile_source,
        atm_volatility: atm_vol,
        atm_volatility_pct: to_pct(atm_vol, 2),
        smile: smile
            .into_iter()
            .map(|(label, volatility)| SmilePoint {
                label,
                volatility,
                volatility_pct: to_pct(volatility, 2),
            })
            .collect(),
        skew_metrics: SkewMetrics {
            skew,
            risk_reversal,
            butterfly,
            skew_pct: to_pct(skew, 2),
            risk_reversal_pct: to_pct(risk_reversal, 2),
            butterfly_pct: to_pct(butterfly, 2),
        },
        skew_signal,
        skew_interpretation: skew_signal.interpretation().to_string(),
        term_structure,
        term_shape,
        term_interpretation: term_shape.interpretation().to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "smile_ratios": "10D_Put 1.30, 25D_Put 1.15, ATM 1.00, 25D_Call 0.95, 10D_Call 0.90",
        "term_ratios": "1W 1.10, 1M 1.00, 3M 0.95, 6M 0.92, 1Y 0.90",
        "skew_thresholds_vol_pts": [3, 1, -1],
    });

    Ok(with_metadata(
        "Implied Volatility Smile & Term Structure (ATM-scaled)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
