//! File-based configuration loading

use super::types::CacheConfig;
use crate::error::{ScoutError, ScoutResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// TOML is used for `.toml` files, JSON for everything else.
/// Returns the default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> ScoutResult<CacheConfig> {
    if !path.exists() {
        tracing::debug!(
            "Cache config '{}' not found, using defaults",
            path.display()
        );
        return Ok(CacheConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ScoutError::io_with_path(
            format!("Failed to read config file: {}", e),
            path.display().to_string(),
        )
    })?;

    let config: CacheConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            ScoutError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            ScoutError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("cache.toml");
        fs::write(
            &config_path,
            r#"
max_entries = 8
ttl = "2h"
merge_on_names = false
"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.max_entries, 8);
        assert_eq!(config.ttl, Some(Duration::from_secs(7200)));
        assert!(!config.merge_on_names);
    }

    #[test]
    fn test_load_from_json_file_without_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("cache.json");
        fs::write(&config_path, r#"{ "max_entries": 3, "ttl": null }"#).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.max_entries, 3);
        assert!(config.ttl.is_none());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("cache.toml");
        fs::write(&config_path, "max_entries = \"many\"").unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert_eq!(err.error_code(), "SCOUT_CONFIG");
    }
}
