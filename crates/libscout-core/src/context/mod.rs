//! Prompt context injection
//!
//! Renders a snapshot of the resolution cache into outbound prompt messages so
//! that agents can reuse earlier resolutions. Injection is guarded by a marker
//! tag, so running the preprocessor twice over the same conversation adds the
//! block only once.

mod injector;
mod messages;

pub use injector::{CONTEXT_MARKER_CLOSE, CONTEXT_MARKER_OPEN, ContextInjector};
pub use messages::{MessageRole, PromptMessage};
