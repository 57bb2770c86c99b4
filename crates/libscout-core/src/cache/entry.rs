//! Stored entries and their bookkeeping

use super::record::CacheRecord;
use chrono::{DateTime, Utc};

/// A record as held inside the store.
///
/// Ticks come from one per-store counter, so two operations in the same clock
/// instant are still strictly ordered.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub record: CacheRecord,
    /// Tick of the last read or write
    pub access_tick: u64,
    /// Tick of the last write
    pub update_tick: u64,
    /// Tick at which the key was first inserted
    pub inserted_seq: u64,
}

impl CacheEntry {
    pub fn new(record: CacheRecord, tick: u64) -> Self {
        Self {
            record,
            access_tick: tick,
            update_tick: tick,
            inserted_seq: tick,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>, tick: u64) {
        self.record.last_accessed_at = now;
        self.access_tick = tick;
    }

    /// Expired once strictly more than `ttl` has elapsed since the last write
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.record.updated_at) > ttl
    }
}
