use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file (command input or `--config`) into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Resolve relative paths against the working directory and require a
/// regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_risk_core::AnalysisConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_partial_config() {
        let path = std::env::temp_dir().join("mrisk_config_test.json");
        fs::write(&path, r#"{ "risk": { "move_proxy_multiplier": "6" } }"#).unwrap();
        let config: AnalysisConfig = read_json(path.to_str().unwrap()).unwrap();
        assert_eq!(config.risk.move_proxy_multiplier, dec!(6));
        assert_eq!(config.risk.cvar_multiplier, dec!(1.25));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = read_json::<AnalysisConfig>("/nonexistent/mrisk.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = std::env::temp_dir();
        let err = read_json::<AnalysisConfig>(dir.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Not a file"));
    }
}
