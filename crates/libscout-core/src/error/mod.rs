//! Error types for libscout
//!
//! Every fallible operation returns [`ScoutResult`]. Each variant exposes a stable
//! error code through [`ScoutError::error_code`] so collaborators can branch on it
//! without matching on message text.
//!
//! A cache miss is never an error: lookups return `Option`.

mod constructors;
mod conversions;
mod types;

pub use types::{ScoutError, ScoutResult};
