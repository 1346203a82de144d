//! Yield-curve shape classification and simple forward rates.
//!
//! Takes a sparse mapping of tenor labels ("3M", "2Y", "10Y", ...) to yields,
//! drops labels it does not recognise, and classifies the curve by the slope
//! between its shortest and longest points.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::math::to_pct;
use crate::types::{with_metadata, ComputationOutput, Rate, Years};
use crate::AnalyticsResult;

/// Slope boundary between NORMAL/STEEP and FLAT/INVERTED (50 bps).
const SLOPE_BAND: Decimal = dec!(0.005);

pub const INSUFFICIENT_DATA: &str = "Insufficient data";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tenors the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tenor {
    M1,
    M3,
    M6,
    Y1,
    Y2,
    Y3,
    Y5,
    Y7,
    Y10,
    Y30,
}

impl Tenor {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "1M" => Some(Tenor::M1),
            "3M" => Some(Tenor::M3),
            "6M" => Some(Tenor::M6),
            "1Y" => Some(Tenor::Y1),
            "2Y" => Some(Tenor::Y2),
            "3Y" => Some(Tenor::Y3),
            "5Y" => Some(Tenor::Y5),
            "7Y" => Some(Tenor::Y7),
            "10Y" => Some(Tenor::Y10),
            "30Y" => Some(Tenor::Y30),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tenor::M1 => "1M",
            Tenor::M3 => "3M",
            Tenor::M6 => "6M",
            Tenor::Y1 => "1Y",
            Tenor::Y2 => "2Y",
            Tenor::Y3 => "3Y",
            Tenor::Y5 => "5Y",
            Tenor::Y7 => "7Y",
            Tenor::Y10 => "10Y",
            Tenor::Y30 => "30Y",
        }
    }

    pub fn years(self) -> Years {
        match self {
            Tenor::M1 => Decimal::ONE / dec!(12),
            Tenor::M3 => dec!(0.25),
            Tenor::M6 => dec!(0.5),
            Tenor::Y1 => dec!(1),
            Tenor::Y2 => dec!(2),
            Tenor::Y3 => dec!(3),
            Tenor::Y5 => dec!(5),
            Tenor::Y7 => dec!(7),
            Tenor::Y10 => dec!(10),
            Tenor::Y30 => dec!(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurveShape {
    Steep,
    Normal,
    Flat,
    Inverted,
    Unknown,
}

impl CurveShape {
    /// Classify a long-minus-short slope expressed as a decimal fraction.
    pub fn from_slope(slope: Rate) -> Self {
        if slope > SLOPE_BAND {
            CurveShape::Steep
        } else if slope > Decimal::ZERO {
            CurveShape::Normal
        } else if slope > -SLOPE_BAND {
            CurveShape::Flat
        } else {
            CurveShape::Inverted
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            CurveShape::Steep => "Economic expansion expected; favours growth equities",
            CurveShape::Normal => "Normal economic environment",
            CurveShape::Flat => "Slowdown concerns; defensive positioning advised",
            CurveShape::Inverted => "Recession signal; preference for safe-haven assets",
            CurveShape::Unknown => INSUFFICIENT_DATA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldCurveInput {
    /// Tenor label -> yield (decimal fraction)
    pub rates: BTreeMap<String, Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldCurvePoint {
    pub tenor: Tenor,
    pub tenor_years: Years,
    pub yield_rate: Rate,
}

/// Simple forward between two adjacent curve points:
/// f = (r2 t2 - r1 t1) / (t2 - t1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRate {
    pub label: String,
    pub start: Years,
    pub end: Years,
    pub rate: Rate,
    pub rate_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldCurveOutput {
    pub curve_shape: CurveShape,
    pub interpretation: String,
    /// Longest minus shortest yield, decimal fraction
    pub slope: Rate,
    pub slope_bps: Decimal,
    pub short_rate: Rate,
    pub long_rate: Rate,
    pub short_rate_pct: Decimal,
    pub long_rate_pct: Decimal,
    /// Recognised points sorted by tenor
    pub points: Vec<YieldCurvePoint>,
    pub forward_rates: Vec<ForwardRate>,
    pub data_points: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify the curve and derive adjacent forward rates.
///
/// Unrecognised labels are skipped with a warning. Fewer than two usable
/// points yields `AnalyticsError::InsufficientData`.
pub fn analyze_yield_curve(
    input: &YieldCurveInput,
) -> AnalyticsResult<ComputationOutput<YieldCurveOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Labels normalise case-insensitively, so "3M" and "3m" share a tenor.
    // Map keys iterate in byte order, so the upper-case spelling wins.
    let mut by_tenor: BTreeMap<Tenor, Rate> = BTreeMap::new();
    for (label, &yield_rate) in &input.rates {
        match Tenor::from_label(label) {
            Some(tenor) if by_tenor.contains_key(&tenor) => {
                tracing::warn!(label = %label, "duplicate tenor ignored");
                warnings.push(format!(
                    "Duplicate tenor label '{label}' ignored; {} already supplied",
                    tenor.label()
                ));
            }
            Some(tenor) => {
                by_tenor.insert(tenor, yield_rate);
            }
            None => {
                tracing::warn!(label = %label, "unrecognised tenor label ignored");
                warnings.push(format!("Unrecognised tenor label '{label}' ignored"));
            }
        }
    }

    if by_tenor.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "{INSUFFICIENT_DATA}: at least 2 recognised tenors required, got {}",
            by_tenor.len()
        )));
    }

    let points: Vec<YieldCurvePoint> = by_tenor
        .into_iter()
        .map(|(tenor, yield_rate)| YieldCurvePoint {
            tenor,
            tenor_years: tenor.years(),
            yield_rate,
        })
        .collect();

    let short_rate = points[0].yield_rate;
    let long_rate = points[points.len() - 1].yield_rate;
    let slope = long_rate - short_rate;
    let curve_shape = CurveShape::from_slope(slope);

    let forward_rates = points
        .windows(2)
        .map(|w| {
            let (t1, r1) = (w[0].tenor_years, w[0].yield_rate);
            let (t2, r2) = (w[1].tenor_years, w[1].yield_rate);
            let rate = (r2 * t2 - r1 * t1) / (t2 - t1);
            ForwardRate {
                label: format!("{}-{}", w[0].tenor.label(), w[1].tenor.label()),
                start: t1,
                end: t2,
                rate,
                rate_pct: to_pct(rate, 3),
            }
        })
        .collect();

    let data_points = points.len();
    let output = YieldCurveOutput {
        curve_shape,
        interpretation: curve_shape.interpretation().to_string(),
        slope,
        slope_bps: (slope * dec!(10000)).round_dp(1),
        short_rate,
        long_rate,
        short_rate_pct: to_pct(short_rate, 3),
        long_rate_pct: to_pct(long_rate, 3),
        points,
        forward_rates,
        data_points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "slope": "longest tenor yield - shortest tenor yield",
        "classification_band_bps": 50,
        "forward_rate": "(r2*t2 - r1*t1) / (t2 - t1)",
    });

    Ok(with_metadata(
        "Yield Curve Shape Classification",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
