//! Configuration types for the resolution cache

use crate::error::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum number of cached resolutions
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default time-to-live for a resolution (12 hours)
pub const DEFAULT_TTL_SECS: u64 = 12 * 60 * 60;

/// Default number of entries injected into a prompt
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 20;

/// Configuration for the resolution cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries before least-recently-used eviction
    pub max_entries: usize,
    /// Absolute expiry measured from the last write. `None` disables expiry.
    #[serde(with = "humantime_serde")]
    pub ttl: Option<Duration>,
    /// Treat an existing entry as the same resource when its names intersect
    /// the incoming names
    pub merge_on_names: bool,
    /// Default snapshot size used for prompt injection
    pub snapshot_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: Some(Duration::from_secs(DEFAULT_TTL_SECS)),
            merge_on_names: true,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

impl CacheConfig {
    /// Time-bounded store: TTL on, identity matched by key or identifier only
    pub fn ttl_store() -> Self {
        Self {
            merge_on_names: false,
            ..Self::default()
        }
    }

    /// Alias repository: no expiry, identity also matched by shared names
    pub fn alias_repository() -> Self {
        Self {
            ttl: None,
            merge_on_names: true,
            ..Self::default()
        }
    }

    /// Set the capacity
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set or disable the TTL
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Toggle merge-by-names identity matching
    pub fn with_merge_on_names(mut self, merge_on_names: bool) -> Self {
        self.merge_on_names = merge_on_names;
        self
    }

    /// Set the default snapshot size
    pub fn with_snapshot_limit(mut self, snapshot_limit: usize) -> Self {
        self.snapshot_limit = snapshot_limit;
        self
    }

    /// Check that the configuration describes a usable cache
    pub fn validate(&self) -> ScoutResult<()> {
        if self.max_entries == 0 {
            return Err(ScoutError::config_with_context(
                "max_entries must be at least 1",
                "Validating cache configuration",
            ));
        }
        if let Some(ttl) = self.ttl {
            if ttl.is_zero() {
                return Err(ScoutError::config_with_context(
                    "ttl must be greater than zero (omit it to disable expiry)",
                    "Validating cache configuration",
                ));
            }
        }
        Ok(())
    }
}
