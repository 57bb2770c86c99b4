//! Capacity and TTL eviction
//!
//! Both policies are idempotent and run inside the store's gate. Expiry is
//! lazy: it is evaluated against the clock at the start of every operation.

use super::index::ResolutionIndex;
use super::observer::CacheEvent;
use chrono::{DateTime, Utc};
use std::time::Duration;

impl ResolutionIndex {
    /// Remove entries whose last write is older than `ttl`
    pub fn purge_expired(
        &mut self,
        now: DateTime<Utc>,
        ttl: Option<Duration>,
        events: &mut Vec<CacheEvent>,
    ) -> usize {
        let Some(ttl) = ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok()) else {
            return 0;
        };

        let expired: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        let mut purged = 0;
        for key in expired {
            if let Some(entry) = self.remove_entry(&key) {
                purged += 1;
                events.push(CacheEvent::Expired {
                    identifier: entry.record.identifier().to_string(),
                    key,
                });
            }
        }

        self.stats_mut().expirations += purged as u64;
        purged
    }

    /// Evict least recently accessed entries until at most `max_entries` remain
    pub fn enforce_capacity(&mut self, max_entries: usize, events: &mut Vec<CacheEvent>) -> usize {
        let mut evicted = 0;

        while self.len() > max_entries {
            let Some(victim) = self
                .entries()
                .iter()
                .min_by_key(|(_, entry)| (entry.access_tick, entry.inserted_seq))
                .map(|(key, _)| key.clone())
            else {
                break;
            };

            let Some(entry) = self.remove_entry(&victim) else {
                break;
            };
            evicted += 1;
            events.push(CacheEvent::Evicted {
                identifier: entry.record.identifier().to_string(),
                key: victim,
            });
        }

        self.stats_mut().evictions += evicted as u64;
        evicted
    }
}
