//! Cache statistics

use serde::{Deserialize, Serialize};

/// Counters maintained under the store lock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Upserts that created a new record, including one that replaced a
    /// record of the other kind under the same key
    pub inserts: u64,
    /// Upserts that updated an existing resource
    pub updates: u64,
    /// Entries removed for capacity
    pub evictions: u64,
    /// Entries removed by TTL
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Format stats as summary string
    pub fn summary(&self) -> String {
        format!(
            "hits: {}, misses: {}, hit rate: {:.1}%, inserts: {}, updates: {}, evictions: {}, expirations: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.inserts,
            self.updates,
            self.evictions,
            self.expirations
        )
    }
}
