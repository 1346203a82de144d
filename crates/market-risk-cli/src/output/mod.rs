pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted field paths, e.g.
/// `skew_metrics.skew` or `rate_shock_table.-100.new_price`.
/// Arrays are left as leaves.
pub fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut fields = Vec::new();
    collect_fields("", map, &mut fields);
    fields
}

fn collect_fields<'a>(prefix: &str, map: &'a Map<String, Value>, out: &mut Vec<(String, &'a Value)>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) if !inner.is_empty() => collect_fields(&path, inner, out),
            _ => out.push((path, val)),
        }
    }
}

/// Render a leaf for table/CSV cells.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => arr
            .iter()
            .map(format_cell)
            .collect::<Vec<_>>()
            .join(", "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects() {
        let value = json!({
            "price": "9782.1",
            "skew_metrics": { "skew": "0.03", "butterfly": "0.005" },
            "rate_shock_table": { "-100": { "new_price": "10600" } }
        });
        let map = value.as_object().unwrap();
        let paths: Vec<String> = flatten_fields(map).into_iter().map(|(k, _)| k).collect();
        assert!(paths.contains(&"price".to_string()));
        assert!(paths.contains(&"skew_metrics.skew".to_string()));
        assert!(paths.contains(&"rate_shock_table.-100.new_price".to_string()));
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&json!("ATM")), "ATM");
        assert_eq!(format_cell(&json!(50)), "50");
        assert_eq!(format_cell(&Value::Null), "");
        assert_eq!(format_cell(&json!(["a", "b"])), "a, b");
        assert_eq!(format_cell(&json!([{ "x": 1 }])), r#"[{"x":1}]"#);
    }
}
