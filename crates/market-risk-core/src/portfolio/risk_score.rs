//! Bucketed composite risk score from bond (MOVE) and equity (VIX) implied
//! volatility levels.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::types::*;
use crate::AnalyticsResult;

const MOVE_THRESHOLDS: [Decimal; 4] = [dec!(80), dec!(100), dec!(120), dec!(150)];
const VIX_THRESHOLDS: [Decimal; 4] = [dec!(15), dec!(20), dec!(25), dec!(35)];
/// Contribution for each bucket, lowest first.
const BUCKET_SCORES: [u32; 5] = [10, 25, 35, 45, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s < 40 => RiskLevel::Low,
            s if s < 60 => RiskLevel::Medium,
            s if s < 80 => RiskLevel::High,
            _ => RiskLevel::Extreme,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    pub move_value: Decimal,
    pub vix_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub risk_level: RiskLevel,
    /// move_contribution + vix_contribution, in [20, 100]
    pub risk_score: u32,
    pub move_contribution: u32,
    pub vix_contribution: u32,
    /// (vix / 20) * (move / 100); unbounded
    pub vol_multiplier: Decimal,
    pub move_value: Decimal,
    pub vix_value: Decimal,
}

/// MOVE proxy from the VIX level: `vix * multiplier`.
pub fn estimate_move_from_vix(vix: Decimal, multiplier: Decimal) -> Decimal {
    vix * multiplier
}

fn bucket_score(value: Decimal, thresholds: &[Decimal; 4]) -> u32 {
    let bucket = thresholds.iter().take_while(|t| value >= **t).count();
    BUCKET_SCORES[bucket]
}

/// Compute the composite score for a MOVE/VIX pair.
pub fn score_risk(profile: &RiskProfile) -> AnalyticsResult<ComputationOutput<RiskScore>> {
    let start = Instant::now();

    if profile.move_value < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "move_value".into(),
            reason: "must be non-negative".into(),
        });
    }
    if profile.vix_value < Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "vix_value".into(),
            reason: "must be non-negative".into(),
        });
    }

    let move_contribution = bucket_score(profile.move_value, &MOVE_THRESHOLDS);
    let vix_contribution = bucket_score(profile.vix_value, &VIX_THRESHOLDS);
    let risk_score = move_contribution + vix_contribution;
    let vol_multiplier = (profile.vix_value / dec!(20)) * (profile.move_value / dec!(100));

    let output = RiskScore {
        risk_level: RiskLevel::from_score(risk_score),
        risk_score,
        move_contribution,
        vix_contribution,
        vol_multiplier,
        move_value: profile.move_value,
        vix_value: profile.vix_value,
    };

    let assumptions = serde_json::json!({
        "move_thresholds": [80, 100, 120, 150],
        "vix_thresholds": [15, 20, 25, 35],
        "bucket_scores": BUCKET_SCORES,
        "levels": "<40 LOW, <60 MEDIUM, <80 HIGH, else EXTREME",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "MOVE/VIX Bucketed Risk Score",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(move_value: Decimal, vix_value: Decimal) -> RiskScore {
        score_risk(&RiskProfile {
            move_value,
            vix_value,
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_medium_scenario() {
        let s = score(dec!(99), dec!(18));
        assert_eq!(s.move_contribution, 25);
        assert_eq!(s.vix_contribution, 25);
        assert_eq!(s.risk_score, 50);
        assert_eq!(s.risk_level, RiskLevel::Medium);
        assert_eq!(s.vol_multiplier, dec!(0.891));
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(bucket_score(dec!(79.99), &MOVE_THRESHOLDS), 10);
        assert_eq!(bucket_score(dec!(80), &MOVE_THRESHOLDS), 25);
        assert_eq!(bucket_score(dec!(149.9), &MOVE_THRESHOLDS), 45);
        assert_eq!(bucket_score(dec!(150), &MOVE_THRESHOLDS), 50);
        assert_eq!(bucket_score(dec!(35), &VIX_THRESHOLDS), 50);
        assert_eq!(bucket_score(Decimal::ZERO, &VIX_THRESHOLDS), 10);
    }

    #[test]
    fn test_extremes() {
        let calm = score(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(calm.risk_score, 20);
        assert_eq!(calm.risk_level, RiskLevel::Low);

        let panic = score(dec!(200), dec!(80));
        assert_eq!(panic.risk_score, 100);
        assert_eq!(panic.risk_level, RiskLevel::Extreme);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Extreme);
    }

    #[test]
    fn test_move_proxy() {
        assert_eq!(estimate_move_from_vix(dec!(18), dec!(5.5)), dec!(99));
    }

    #[test]
    fn test_negative_input_rejected() {
        let err = score_risk(&RiskProfile {
            move_value: dec!(-1),
            vix_value: dec!(18),
        })
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput { .. }));
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_value(score(dec!(99), dec!(18))).unwrap();
        assert_eq!(json["risk_level"], "MEDIUM");
        assert_eq!(json["risk_score"], 50);
    }
}
