use market_risk_core::analysis::comprehensive::{default_snapshot, run_comprehensive_analysis};
use market_risk_core::analysis::risk_report::{run_risk_report, RiskReportInput};
use market_risk_core::{AnalysisConfig, MarketSnapshot};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn snapshot_json() -> &'static str {
    r#"{
        "short_rate": "0.0359",
        "long_rate": "0.0427",
        "ultra_long_rate": "0.045",
        "vix": "18",
        "equity_index_level": "2650",
        "as_of": "2025-01-15"
    }"#
}

#[test]
fn test_snapshot_parses_and_flows_to_report() {
    let snapshot: MarketSnapshot = serde_json::from_str(snapshot_json()).unwrap();
    let config = AnalysisConfig::default();
    let report = run_comprehensive_analysis(&snapshot, &config)
        .unwrap()
        .result;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["as_of"], "2025-01-15");
    assert_eq!(json["option"]["moneyness"], "ATM");
    assert_eq!(json["yield_curve"]["curve_shape"], "FLAT");
    assert_eq!(json["volatility"]["term_shape"], "BACKWARDATION");
    assert_eq!(json["bond"]["premium_discount"], "Discount");
}

#[test]
fn test_risk_report_sections() {
    let config = AnalysisConfig::default();
    let input = RiskReportInput {
        market: default_snapshot(&config),
        move_value: Some(dec!(99)),
        portfolio_value: dec!(100000000),
        confidence_level: None,
    };
    let report = run_risk_report(&input, &config).unwrap().result;
    let json = serde_json::to_value(&report).unwrap();

    let mut sections: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(|k| k.as_str())
        .collect();
    sections.sort_unstable();
    assert_eq!(
        sections,
        vec![
            "market_analysis",
            "move_estimated",
            "position_sizing",
            "risk_metrics",
            "var_analysis",
        ]
    );
    assert_eq!(json["risk_metrics"]["risk_level"], "MEDIUM");
    assert_eq!(json["risk_metrics"]["risk_score"], 50);
    assert_eq!(json["position_sizing"]["adjusted_allocation"], "0.100");
}

#[test]
fn test_report_input_from_json_with_defaults() {
    let raw = format!(
        r#"{{ "market": {}, "portfolio_value": "250000000" }}"#,
        snapshot_json()
    );
    let input: RiskReportInput = serde_json::from_str(&raw).unwrap();
    let result = run_risk_report(&input, &AnalysisConfig::default()).unwrap();
    assert!(result.result.move_estimated);
    assert_eq!(result.result.as_of, input.market.as_of);
    assert_eq!(result.result.var_analysis.confidence_level, dec!(0.95));
}

#[test]
fn test_config_overrides_sample_instruments() {
    let config: AnalysisConfig = serde_json::from_str(
        r#"{ "sample_bond": { "years_to_maturity": "5" }, "sample_option_days": 0 }"#,
    )
    .unwrap();
    let config_default = AnalysisConfig::default();
    let result = run_comprehensive_analysis(&default_snapshot(&config_default), &config).unwrap();
    assert_eq!(result.result.bond.inputs.periods, 10);
    assert_eq!(result.result.option.price, rust_decimal::Decimal::ZERO);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("option: "));
}
