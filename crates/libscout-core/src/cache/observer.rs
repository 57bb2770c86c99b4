//! Observability hook
//!
//! Every cache event is logged through `tracing`. A host may additionally
//! install a [`CacheObserver`] to receive the same events; observers have no
//! influence on cache behaviour.

use super::record::RecordKind;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Something that happened inside the cache
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A resolution was stored
    Upserted {
        kind: RecordKind,
        search_term: String,
        identifier: String,
        created: bool,
    },
    /// A lookup found an entry
    Hit { term: String, key: String },
    /// A lookup found nothing
    Miss { term: String },
    /// An entry was merged into a record under another key, or two distinct
    /// identifiers collapsed into one record
    Merged {
        kind: RecordKind,
        from_key: String,
        into_key: String,
        from_identifier: String,
        into_identifier: String,
    },
    /// An alias moved from one entry to another
    AliasMoved {
        alias: String,
        from_key: String,
        to_key: String,
    },
    /// An alias was not registered on `key` because another entry already
    /// uses it as its canonical key
    AliasShadowed { alias: String, key: String },
    /// Removed for capacity
    Evicted { key: String, identifier: String },
    /// Removed by TTL
    Expired { key: String, identifier: String },
    /// Removed on request
    Invalidated { key: String },
}

impl CacheEvent {
    fn log(&self) {
        match self {
            CacheEvent::Upserted {
                kind,
                search_term,
                identifier,
                created,
            } => info!(
                kind = %kind,
                search_term = %search_term,
                identifier = %identifier,
                created = *created,
                "Cached resolution"
            ),
            CacheEvent::Hit { term, key } => debug!(term = %term, key = %key, "Cache hit"),
            CacheEvent::Miss { term } => debug!(term = %term, "Cache miss"),
            CacheEvent::Merged {
                kind,
                from_key,
                into_key,
                from_identifier,
                into_identifier,
            } => {
                if from_identifier == into_identifier {
                    debug!(
                        kind = %kind,
                        from_key = %from_key,
                        into_key = %into_key,
                        "Re-keyed cached resolution"
                    );
                } else {
                    warn!(
                        kind = %kind,
                        from_key = %from_key,
                        into_key = %into_key,
                        from_identifier = %from_identifier,
                        into_identifier = %into_identifier,
                        "Merged two distinct resolutions that share a name"
                    );
                }
            }
            CacheEvent::AliasMoved {
                alias,
                from_key,
                to_key,
            } => debug!(alias = %alias, from_key = %from_key, to_key = %to_key, "Moved alias"),
            CacheEvent::AliasShadowed { alias, key } => {
                debug!(alias = %alias, key = %key, "Skipped alias owned by another entry's key")
            }
            CacheEvent::Evicted { key, identifier } => {
                debug!(key = %key, identifier = %identifier, "Evicted least recently used entry")
            }
            CacheEvent::Expired { key, identifier } => {
                debug!(key = %key, identifier = %identifier, "Expired stale entry")
            }
            CacheEvent::Invalidated { key } => debug!(key = %key, "Invalidated entry"),
        }
    }
}

/// Sink for cache events
#[cfg_attr(test, mockall::automock)]
pub trait CacheObserver: Send + Sync {
    fn on_event(&self, event: &CacheEvent);
}

/// Holds the optional observer of a store
#[derive(Default)]
pub(crate) struct ObserverSlot {
    observer: RwLock<Option<Arc<dyn CacheObserver>>>,
}

impl ObserverSlot {
    pub fn set(&self, observer: Option<Arc<dyn CacheObserver>>) {
        *self.observer.write() = observer;
    }

    pub fn is_set(&self) -> bool {
        self.observer.read().is_some()
    }

    pub fn emit_all(&self, events: &[CacheEvent]) {
        for event in events {
            event.log();
        }

        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            for event in events {
                observer.on_event(event);
            }
        }
    }
}

impl std::fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("observer", &self.is_set())
            .finish()
    }
}
