//! Environment variable overrides
//!
//! Supports variables with the `LIBSCOUT_CACHE_` prefix. Unset variables leave
//! the corresponding field untouched.

use super::types::CacheConfig;
use crate::error::{ScoutError, ScoutResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Maximum number of entries
pub const ENV_MAX_ENTRIES: &str = "LIBSCOUT_CACHE_MAX_ENTRIES";
/// TTL in seconds; `0` disables expiry
pub const ENV_TTL_SECS: &str = "LIBSCOUT_CACHE_TTL_SECS";
/// `true`/`false` toggle for merge-by-names
pub const ENV_MERGE_ON_NAMES: &str = "LIBSCOUT_CACHE_MERGE_ON_NAMES";
/// Default snapshot size
pub const ENV_SNAPSHOT_LIMIT: &str = "LIBSCOUT_CACHE_SNAPSHOT_LIMIT";

impl CacheConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(self) -> ScoutResult<Self> {
        self.apply_overrides_from(|name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> ScoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_ENTRIES) {
            self.max_entries = parse_var(ENV_MAX_ENTRIES, &value)?;
        }

        if let Some(value) = lookup(ENV_TTL_SECS) {
            let secs: u64 = parse_var(ENV_TTL_SECS, &value)?;
            self.ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(value) = lookup(ENV_MERGE_ON_NAMES) {
            self.merge_on_names = parse_var(ENV_MERGE_ON_NAMES, &value)?;
        }

        if let Some(value) = lookup(ENV_SNAPSHOT_LIMIT) {
            self.snapshot_limit = parse_var(ENV_SNAPSHOT_LIMIT, &value)?;
        }

        self.validate()?;
        Ok(self)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> ScoutResult<T> {
    value.trim().parse().map_err(|_| {
        ScoutError::config_with_context(
            format!("Invalid {} value: '{}'", name, value),
            "Loading cache configuration from environment",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = CacheConfig::default().apply_overrides_from(lookup(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let config = CacheConfig::default()
            .apply_overrides_from(lookup(&[
                (ENV_MAX_ENTRIES, "5"),
                (ENV_TTL_SECS, "60"),
                (ENV_MERGE_ON_NAMES, "false"),
                (ENV_SNAPSHOT_LIMIT, " 3 "),
            ]))
            .unwrap();

        assert_eq!(config.max_entries, 5);
        assert_eq!(config.ttl, Some(Duration::from_secs(60)));
        assert!(!config.merge_on_names);
        assert_eq!(config.snapshot_limit, 3);
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let config = CacheConfig::default()
            .apply_overrides_from(lookup(&[(ENV_TTL_SECS, "0")]))
            .unwrap();
        assert!(config.ttl.is_none());
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let err = CacheConfig::default()
            .apply_overrides_from(lookup(&[(ENV_MAX_ENTRIES, "lots")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "SCOUT_CONFIG");
        assert!(err.to_string().contains(ENV_MAX_ENTRIES));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = CacheConfig::default().apply_overrides_from(lookup(&[(ENV_MAX_ENTRIES, "0")]));
        assert!(result.is_err());
    }
}
