//! The resolution cache store
//!
//! All state lives in one [`ResolutionIndex`] behind a `tokio::sync::Mutex`.
//! Tokio's mutex admits waiters in FIFO order and is not reentrant, so every
//! public operation is atomic with respect to every other operation on the same
//! instance, and operations complete in the order they were admitted.

use super::clock::{SharedClock, SystemClock};
use super::index::ResolutionIndex;
use super::observer::{CacheObserver, ObserverSlot};
use super::record::{CacheRecord, RecordKind};
use super::snapshot::SnapshotEntry;
use super::stats::CacheStats;
use super::validation::{UpsertInput, validate};
use crate::config::CacheConfig;
use crate::error::ScoutResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Operations resolution agents and prompt middleware rely on
#[async_trait]
pub trait ResolutionStore: Send + Sync {
    /// Store a resolution and return the stored record
    async fn upsert(&self, input: UpsertInput) -> ScoutResult<CacheRecord>;

    /// Look up by search term or alias
    async fn get(&self, term: &str) -> Option<CacheRecord>;

    /// Newest-first projection of at most `limit` entries
    async fn snapshot(&self, limit: usize, kind: Option<RecordKind>) -> Vec<SnapshotEntry>;

    /// Current entry count
    async fn size(&self) -> usize;
}

/// Bounded, alias-indexed cache of library and repository resolutions
#[derive(Debug)]
pub struct ResolutionCache {
    config: CacheConfig,
    clock: SharedClock,
    state: Mutex<ResolutionIndex>,
    observer: ObserverSlot,
}

/// Thread-safe shared resolution cache
pub type SharedResolutionCache = Arc<ResolutionCache>;

impl ResolutionCache {
    /// Create a cache using the system clock
    pub fn new(config: CacheConfig) -> ScoutResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(config: CacheConfig, clock: SharedClock) -> ScoutResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            state: Mutex::new(ResolutionIndex::new()),
            observer: ObserverSlot::default(),
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
            state: Mutex::new(ResolutionIndex::new()),
            observer: ObserverSlot::default(),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Install or remove the event sink
    pub fn set_observer(&self, observer: Option<Arc<dyn CacheObserver>>) {
        self.observer.set(observer);
    }

    /// Validate and store a resolution.
    ///
    /// Invalid input is rejected before anything is touched.
    pub async fn upsert(&self, input: impl Into<UpsertInput>) -> ScoutResult<CacheRecord> {
        let input = input.into();
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let validated = validate(input, now)?;

        let mut events = Vec::new();
        state.purge_expired(now, self.config.ttl, &mut events);

        let outcome = state.upsert(validated, now, self.config.merge_on_names, &mut events);
        if outcome.created {
            state.enforce_capacity(self.config.max_entries, &mut events);
        }

        self.observer.emit_all(&events);
        Ok(outcome.record)
    }

    /// Look up a resolution by search term or alias
    pub async fn get(&self, term: &str) -> Option<CacheRecord> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let mut events = Vec::new();
        state.purge_expired(now, self.config.ttl, &mut events);
        let record = state.get(term, now, &mut events);

        self.observer.emit_all(&events);
        record
    }

    /// Newest-first projection of at most `limit` entries, optionally of one kind
    pub async fn snapshot(&self, limit: usize, kind: Option<RecordKind>) -> Vec<SnapshotEntry> {
        let mut state = self.state.lock().await;
        let mut events = Vec::new();
        state.purge_expired(self.clock.now(), self.config.ttl, &mut events);
        let snapshot = state.snapshot(limit, kind);

        self.observer.emit_all(&events);
        snapshot
    }

    /// Every live entry, newest first
    pub async fn all(&self) -> Vec<SnapshotEntry> {
        self.snapshot(usize::MAX, None).await
    }

    /// Number of live entries
    pub async fn size(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut events = Vec::new();
        state.purge_expired(self.clock.now(), self.config.ttl, &mut events);
        let size = state.len();

        self.observer.emit_all(&events);
        size
    }

    /// Remove the entry reached by `term` (key or alias)
    pub async fn invalidate(&self, term: &str) -> bool {
        let mut state = self.state.lock().await;
        let mut events = Vec::new();
        state.purge_expired(self.clock.now(), self.config.ttl, &mut events);
        let removed = state.invalidate(term, &mut events);

        self.observer.emit_all(&events);
        removed
    }

    /// Remove all entries
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let cleared = state.len();
        state.clear();
        tracing::debug!("Cleared resolution cache ({} entries)", cleared);
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats().clone()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl ResolutionStore for ResolutionCache {
    async fn upsert(&self, input: UpsertInput) -> ScoutResult<CacheRecord> {
        ResolutionCache::upsert(self, input).await
    }

    async fn get(&self, term: &str) -> Option<CacheRecord> {
        ResolutionCache::get(self, term).await
    }

    async fn snapshot(&self, limit: usize, kind: Option<RecordKind>) -> Vec<SnapshotEntry> {
        ResolutionCache::snapshot(self, limit, kind).await
    }

    async fn size(&self) -> usize {
        ResolutionCache::size(self).await
    }
}

/// Create a shared resolution cache
pub fn create_shared_cache(config: CacheConfig) -> ScoutResult<SharedResolutionCache> {
    Ok(Arc::new(ResolutionCache::new(config)?))
}
