//! Snapshot injection into outbound messages

use super::messages::{MessageRole, PromptMessage};
use crate::cache::{RecordKind, ResolutionStore, SnapshotEntry, render_json};
use crate::config::CacheConfig;
use crate::error::ScoutResult;
use std::sync::Arc;
use tracing::debug;

/// Opening tag of an injected block
pub const CONTEXT_MARKER_OPEN: &str = "<resolution-cache>";
/// Closing tag of an injected block
pub const CONTEXT_MARKER_CLOSE: &str = "</resolution-cache>";

const PREAMBLE: &str = "Previously resolved libraries and repositories. \
Reuse these identifiers instead of resolving the same names again.";

/// Injects the cache snapshot into a conversation
pub struct ContextInjector {
    store: Arc<dyn ResolutionStore>,
    limit: usize,
    kind: Option<RecordKind>,
}

impl ContextInjector {
    pub fn new(store: Arc<dyn ResolutionStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            kind: None,
        }
    }

    /// Inject at most `config.snapshot_limit` entries
    pub fn from_config(store: Arc<dyn ResolutionStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.snapshot_limit)
    }

    /// Restrict the injected snapshot to one record kind
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether any message already carries an injected block
    pub fn is_injected(messages: &[PromptMessage]) -> bool {
        messages
            .iter()
            .any(|m| m.content.contains(CONTEXT_MARKER_OPEN))
    }

    /// Render entries as a marked block; `None` when there is nothing to say
    pub fn render(entries: &[SnapshotEntry]) -> ScoutResult<Option<String>> {
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!(
            "{}\n{}\n{}\n{}",
            CONTEXT_MARKER_OPEN,
            PREAMBLE,
            render_json(entries)?,
            CONTEXT_MARKER_CLOSE
        )))
    }

    /// Insert the snapshot as a system message after the leading system
    /// messages. Returns whether a block was added.
    pub async fn inject(&self, messages: &mut Vec<PromptMessage>) -> ScoutResult<bool> {
        if Self::is_injected(messages) {
            debug!("Resolution cache context already present, skipping injection");
            return Ok(false);
        }

        let entries = self.store.snapshot(self.limit, self.kind).await;
        let Some(block) = Self::render(&entries)? else {
            return Ok(false);
        };

        let position = messages
            .iter()
            .take_while(|m| m.role == MessageRole::System)
            .count();
        messages.insert(position, PromptMessage::system(block));

        debug!(
            "Injected {} cached resolutions at message {}",
            entries.len(),
            position
        );
        Ok(true)
    }
}

impl std::fmt::Debug for ContextInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextInjector")
            .field("limit", &self.limit)
            .field("kind", &self.kind)
            .finish()
    }
}
