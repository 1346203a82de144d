use market_risk_core::fixed_income::bonds::{analyze_bond, BondInput, PremiumDiscount};
use market_risk_core::volatility_surface::implied_vol_surface::{
    analyze_vol_surface, SkewSignal, TermShape, VolSurfaceInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bond(coupon_rate: Decimal, ytm: Decimal, payment_frequency: u32) -> BondInput {
    BondInput {
        face_value: dec!(10000),
        coupon_rate,
        ytm,
        years_to_maturity: dec!(10),
        payment_frequency,
    }
}

// ---------------------------------------------------------------------------
// Bonds
// ---------------------------------------------------------------------------

#[test]
fn test_price_strictly_decreasing_in_ytm() {
    for freq in [1, 2, 4, 12] {
        let mut last = Decimal::MAX;
        let mut ytm = dec!(0.005);
        while ytm <= dec!(0.10) {
            let price = analyze_bond(&bond(dec!(0.04), ytm, freq))
                .unwrap()
                .result
                .price;
            assert!(price < last, "freq {freq}: price {price} at ytm {ytm}");
            last = price;
            ytm += dec!(0.005);
        }
    }
}

#[test]
fn test_convexity_non_negative() {
    for coupon in [Decimal::ZERO, dec!(0.02), dec!(0.08)] {
        for ytm in [dec!(0.01), dec!(0.05), dec!(0.12)] {
            let out = analyze_bond(&bond(coupon, ytm, 2)).unwrap().result;
            assert!(out.convexity >= Decimal::ZERO);
            assert!(out.modified_duration > Decimal::ZERO);
        }
    }
}

#[test]
fn test_premium_discount_par() {
    let at = |ytm| {
        analyze_bond(&bond(dec!(0.05), ytm, 2))
            .unwrap()
            .result
            .premium_discount
    };
    assert_eq!(at(dec!(0.04)), PremiumDiscount::Premium);
    assert_eq!(at(dec!(0.05)), PremiumDiscount::Par);
    assert_eq!(at(dec!(0.06)), PremiumDiscount::Discount);
}

#[test]
fn test_shock_estimate_tracks_full_repricing() {
    let out = analyze_bond(&bond(dec!(0.04), dec!(0.0427), 2)).unwrap().result;
    for (bps, shock) in &out.rate_shock_table {
        let rel = shock.approximation_error.unwrap().abs() / out.price;
        // Second-order estimate stays within 5 bp of price for |dy| <= 100 bp
        assert!(rel < dec!(0.0005), "{bps} bp: relative error {rel}");
    }
    let e50 = out.rate_shock_table[&-50].approximation_error.unwrap().abs();
    let e100 = out.rate_shock_table[&-100].approximation_error.unwrap().abs();
    assert!(e50 < e100);
}

#[test]
fn test_current_yield() {
    let out = analyze_bond(&bond(dec!(0.04), dec!(0.0427), 2)).unwrap().result;
    assert!((out.current_yield - dec!(400) / out.price).abs() < dec!(0.0000000000001));
}

// ---------------------------------------------------------------------------
// Volatility surface
// ---------------------------------------------------------------------------

#[test]
fn test_vix_implied_surface() {
    let out = analyze_vol_surface(&VolSurfaceInput {
        spot: Some(dec!(2650)),
        atm_volatility: dec!(0.18),
        smile: None,
    })
    .unwrap()
    .result;
    assert_eq!(out.skew_metrics.risk_reversal, -out.skew_metrics.skew);
    assert_eq!(out.skew_signal, SkewSignal::DownsideStress);
    assert_eq!(out.term_shape, TermShape::Backwardation);
    assert_eq!(out.term_structure.len(), 5);
    assert_eq!(out.term_structure[4].volatility_pct, dec!(16.20));
}

#[test]
fn test_flat_supplied_smile_is_balanced() {
    let smile = ["10D_Put", "25D_Put", "ATM", "25D_Call", "10D_Call"]
        .iter()
        .map(|l| (l.to_string(), dec!(0.20)))
        .collect();
    let out = analyze_vol_surface(&VolSurfaceInput {
        spot: None,
        atm_volatility: dec!(0.20),
        smile: Some(smile),
    })
    .unwrap()
    .result;
    assert_eq!(out.skew_metrics.skew, Decimal::ZERO);
    assert_eq!(out.skew_metrics.butterfly, Decimal::ZERO);
    assert_eq!(out.skew_signal, SkewSignal::Balanced);
    assert_eq!(out.skew_interpretation, "Balanced volatility structure");
}
