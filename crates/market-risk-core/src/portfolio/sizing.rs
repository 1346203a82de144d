use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AnalyticsError;
use crate::types::*;
use crate::AnalyticsResult;

use super::risk_score::RiskLevel;

/// Share of the portfolio allotted before risk adjustment.
pub const BASE_ALLOCATION: Rate = dec!(0.10);

/// Input for risk-scaled position sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizingInput {
    /// Composite risk score in [0, 100]
    pub risk_score: u32,
    pub portfolio_value: Money,
}

/// Output of risk-scaled position sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionPlan {
    pub risk_level: RiskLevel,
    pub base_allocation: Rate,
    /// 1.2 / 1.0 / 0.7 / 0.4 by risk level
    pub risk_adjustment_factor: Decimal,
    /// base_allocation * risk_adjustment_factor
    pub adjusted_allocation: Rate,
    pub max_position_value: Money,
    pub stop_loss_pct: Rate,
    pub stop_loss_value: Money,
}

fn risk_adjustment(level: RiskLevel) -> Decimal {
    match level {
        RiskLevel::Low => dec!(1.2),
        RiskLevel::Medium => dec!(1.0),
        RiskLevel::High => dec!(0.7),
        RiskLevel::Extreme => dec!(0.4),
    }
}

/// Stop-loss tightens with risk but bottoms out at 2% for HIGH and above.
fn stop_loss(level: RiskLevel) -> Rate {
    match level {
        RiskLevel::Low => dec!(0.05),
        RiskLevel::Medium => dec!(0.03),
        RiskLevel::High | RiskLevel::Extreme => dec!(0.02),
    }
}

/// Scale the base allocation by the risk level and attach a stop-loss.
pub fn size_position(
    input: &PositionSizingInput,
) -> AnalyticsResult<ComputationOutput<PositionPlan>> {
    let start = Instant::now();

    if input.portfolio_value <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidInput {
            field: "portfolio_value".into(),
            reason: "Portfolio value must be positive".into(),
        });
    }
    if input.risk_score > 100 {
        return Err(AnalyticsError::InvalidInput {
            field: "risk_score".into(),
            reason: "Risk score must lie in [0, 100]".into(),
        });
    }

    let risk_level = RiskLevel::from_score(input.risk_score);
    let risk_adjustment_factor = risk_adjustment(risk_level);
    let adjusted_allocation = BASE_ALLOCATION * risk_adjustment_factor;
    let max_position_value = input.portfolio_value * adjusted_allocation;
    let stop_loss_pct = stop_loss(risk_level);

    let output = PositionPlan {
        risk_level,
        base_allocation: BASE_ALLOCATION,
        risk_adjustment_factor,
        adjusted_allocation,
        max_position_value,
        stop_loss_pct,
        stop_loss_value: max_position_value * stop_loss_pct,
    };

    let assumptions = serde_json::json!({
        "base_allocation": BASE_ALLOCATION.to_string(),
        "risk_adjustment": "LOW 1.2, MEDIUM 1.0, HIGH 0.7, EXTREME 0.4",
        "stop_loss": "LOW 5%, MEDIUM 3%, HIGH/EXTREME 2%",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Risk-Scaled Position Sizing",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(risk_score: u32) -> PositionPlan {
        size_position(&PositionSizingInput {
            risk_score,
            portfolio_value: dec!(100000000),
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_medium_plan() {
        let p = plan(50);
        assert_eq!(p.risk_level, RiskLevel::Medium);
        assert_eq!(p.adjusted_allocation, dec!(0.10));
        assert_eq!(p.max_position_value, dec!(10000000));
        assert_eq!(p.stop_loss_pct, dec!(0.03));
        assert_eq!(p.stop_loss_value, dec!(300000));
    }

    #[test]
    fn test_low_risk_scales_up() {
        let p = plan(20);
        assert_eq!(p.adjusted_allocation, dec!(0.12));
        assert_eq!(p.max_position_value, dec!(12000000));
        assert_eq!(p.stop_loss_value, dec!(600000));
    }

    #[test]
    fn test_high_and_extreme_share_stop_loss() {
        let high = plan(70);
        let extreme = plan(95);
        assert_eq!(high.adjusted_allocation, dec!(0.07));
        assert_eq!(extreme.adjusted_allocation, dec!(0.04));
        assert_eq!(high.stop_loss_pct, extreme.stop_loss_pct);
    }

    #[test]
    fn test_allocation_non_increasing_in_score() {
        let mut last = Decimal::MAX;
        for score in (0..=100).step_by(5) {
            let a = plan(score).adjusted_allocation;
            assert!(a <= last, "allocation rose at score {score}");
            last = a;
        }
    }

    #[test]
    fn test_validation() {
        let err = size_position(&PositionSizingInput {
            risk_score: 50,
            portfolio_value: Decimal::ZERO,
        })
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput { .. }));

        let err = size_position(&PositionSizingInput {
            risk_score: 101,
            portfolio_value: dec!(1000),
        })
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput { .. }));
    }
}
