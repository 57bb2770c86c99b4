//! Cache configuration
//!
//! [`CacheConfig`] carries the policy knobs of the resolution cache. It can be
//! built in code, loaded from a TOML or JSON file, and adjusted through
//! `LIBSCOUT_CACHE_*` environment variables.

mod env_loader;
mod file_loader;
mod types;

pub use env_loader::{
    ENV_MAX_ENTRIES, ENV_MERGE_ON_NAMES, ENV_SNAPSHOT_LIMIT, ENV_TTL_SECS,
};
pub use file_loader::load_from_file;
pub use types::{
    CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_SNAPSHOT_LIMIT, DEFAULT_TTL_SECS,
};
