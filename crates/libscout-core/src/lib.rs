//! libscout core library
//!
//! An in-memory cache of library and repository resolutions for documentation
//! agents. Agents ask the cache before resolving a search term against an
//! external service and write the result back afterwards; prompt middleware
//! injects a snapshot of the cache into outbound messages.
//!
//! ```no_run
//! use libscout_core::{CacheConfig, LibraryInput, ResolutionCache};
//!
//! # async fn demo() -> libscout_core::ScoutResult<()> {
//! let cache = ResolutionCache::new(CacheConfig::default())?;
//! cache
//!     .upsert(LibraryInput::new("react", "/facebook/react").alias("reactjs"))
//!     .await?;
//! assert!(cache.get("ReactJS").await.is_some());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod error;

pub use cache::{
    CacheEvent, CacheObserver, CacheRecord, CacheStats, Clock, LibraryInput, LibrarySourceType,
    ManualClock, RecordKind, RepositoryInput, RepositorySourceType, ResolutionCache,
    ResolutionStore, ResolvedTarget, SharedResolutionCache, SnapshotEntry, SystemClock,
    UpsertInput, create_shared_cache, normalize,
};
pub use config::{CacheConfig, load_from_file};
pub use context::{ContextInjector, MessageRole, PromptMessage};
pub use error::{ScoutError, ScoutResult};
