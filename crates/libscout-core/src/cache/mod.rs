//! Library resolution cache
//!
//! Remembers which library ID or `owner/repository` a search term resolved to,
//! so repeated lookups for the same target skip the expensive external
//! resolution.
//!
//! ## Policies
//!
//! - **Capacity**: at most `max_entries` records; the least recently accessed
//!   record is evicted first.
//! - **TTL**: a record whose last write is older than `ttl` is purged lazily on
//!   the next operation. Disabled when `ttl` is `None`.
//! - **Identity**: a write for a resource the cache already knows (same key,
//!   same identifier, or a shared name when `merge_on_names` is set) updates
//!   that record instead of adding a second one.

mod clock;
mod entry;
mod eviction;
mod index;
mod normalize;
mod observer;
mod record;
mod snapshot;
mod stats;
mod store;
mod validation;


pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use normalize::normalize;
pub use observer::{CacheEvent, CacheObserver};
pub use record::{
    CacheRecord, LibrarySourceType, RecordKind, RepositorySourceType, ResolvedTarget,
};
pub use snapshot::{SnapshotEntry, render_json};
pub use stats::CacheStats;
pub use store::{ResolutionCache, ResolutionStore, SharedResolutionCache, create_shared_cache};
pub use validation::{
    LibraryInput, MAX_TRUST_SCORE, NameInput, RepositoryInput, UpsertInput,
};
