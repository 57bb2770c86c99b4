//! Snapshot projection
//!
//! A snapshot is the read-only view handed to prompt injection: most recently
//! updated first, truncated, and without the store's bookkeeping fields.

use super::entry::CacheEntry;
use super::record::{CacheRecord, RecordKind, ResolvedTarget};
use crate::error::ScoutResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Externally consumable projection of a cached record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub names: Vec<String>,
    #[serde(flatten)]
    pub target: ResolvedTarget,
    pub resolved_at: DateTime<Utc>,
}

impl SnapshotEntry {
    pub fn kind(&self) -> RecordKind {
        self.target.kind()
    }

    pub fn identifier(&self) -> &str {
        self.target.identifier()
    }
}

impl From<&CacheRecord> for SnapshotEntry {
    fn from(record: &CacheRecord) -> Self {
        Self {
            names: record.names.clone(),
            target: record.target.clone(),
            resolved_at: record.resolved_at,
        }
    }
}

/// Order by last write (newest first), filter by kind and truncate
pub(crate) fn project<'a, I>(entries: I, limit: usize, kind: Option<RecordKind>) -> Vec<SnapshotEntry>
where
    I: IntoIterator<Item = &'a CacheEntry>,
{
    let mut selected: Vec<&CacheEntry> = entries
        .into_iter()
        .filter(|entry| kind.is_none_or(|k| entry.record.kind() == k))
        .collect();

    selected.sort_by_key(|entry| (Reverse(entry.record.updated_at), Reverse(entry.update_tick)));

    selected
        .into_iter()
        .take(limit)
        .map(|entry| SnapshotEntry::from(&entry.record))
        .collect()
}

/// Render a snapshot as pretty JSON
pub fn render_json(entries: &[SnapshotEntry]) -> ScoutResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::record::{LibrarySourceType, RepositorySourceType};
    use chrono::Duration;

    fn entry(name: &str, kind: RecordKind, updated_at: DateTime<Utc>, tick: u64) -> CacheEntry {
        let target = match kind {
            RecordKind::Library => ResolvedTarget::Library {
                library_id: format!("/org/{}", name),
                source_type: LibrarySourceType::Official,
                trust_score: None,
                snippet_count: None,
            },
            RecordKind::Repository => ResolvedTarget::Repository {
                repository: format!("org/{}", name),
                source_type: RepositorySourceType::Official,
            },
        };
        CacheEntry::new(
            CacheRecord {
                names: vec![name.to_string()],
                target,
                resolved_at: updated_at,
                last_accessed_at: updated_at,
                updated_at,
            },
            tick,
        )
    }

    #[test]
    fn test_orders_newest_first_and_truncates() {
        let base = Utc::now();
        let entries = vec![
            entry("a", RecordKind::Library, base, 1),
            entry("b", RecordKind::Library, base + Duration::seconds(2), 2),
            entry("c", RecordKind::Library, base + Duration::seconds(1), 3),
        ];

        let snapshot = project(&entries, 2, None);
        let names: Vec<_> = snapshot.iter().map(|e| e.names[0].as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_equal_timestamps_fall_back_to_ticks() {
        let base = Utc::now();
        let entries = vec![
            entry("a", RecordKind::Library, base, 1),
            entry("b", RecordKind::Library, base, 2),
        ];
        let snapshot = project(&entries, 10, None);
        assert_eq!(snapshot[0].names[0], "b");
    }

    #[test]
    fn test_kind_filter() {
        let base = Utc::now();
        let entries = vec![
            entry("react", RecordKind::Library, base, 1),
            entry("tokio", RecordKind::Repository, base, 2),
        ];
        let snapshot = project(&entries, 10, Some(RecordKind::Repository));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].identifier(), "org/tokio");
    }

    #[test]
    fn test_render_omits_bookkeeping() {
        let entries = vec![entry("react", RecordKind::Library, Utc::now(), 1)];
        let json = render_json(&project(&entries, 10, None)).unwrap();
        assert!(json.contains("\"libraryId\": \"/org/react\""));
        assert!(!json.contains("lastAccessedAt"));
        assert!(!json.contains("updatedAt"));
    }
}
