use serde_json::{Map, Value};

use super::format_cell;

/// Headline field per command, most specific first. `risk_score` and
/// `risk_level` also match the nested `risk_metrics` of a risk report.
const PRIORITY_KEYS: [&str; 8] = [
    "risk_score",
    "adjusted_allocation",
    "var_1d",
    "price",
    "curve_shape",
    "skew_signal",
    "half_life_years",
    "risk_level",
];

/// Print just the headline value of the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => match headline(map) {
            Some(val) => println!("{}", format_cell(val)),
            None => match map.iter().next() {
                Some((key, val)) => println!("{}: {}", key, format_cell(val)),
                None => println!("{{}}"),
            },
        },
        other => println!("{}", format_cell(other)),
    }
}

/// First non-null priority key at the top level, then one level down.
fn headline(map: &Map<String, Value>) -> Option<&Value> {
    let top = PRIORITY_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
    top.or_else(|| {
        PRIORITY_KEYS.iter().find_map(|key| {
            map.values()
                .filter_map(Value::as_object)
                .find_map(|inner| inner.get(*key).filter(|v| !v.is_null() && !v.is_object()))
        })
    })
}
