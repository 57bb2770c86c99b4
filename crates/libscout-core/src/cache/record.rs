//! Cached resolution records

use super::normalize::{normalize, same_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`ResolvedTarget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Documentation library resolved to a library ID
    Library,
    /// Source repository resolved to `owner/name`
    Repository,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Library => write!(f, "library"),
            RecordKind::Repository => write!(f, "repository"),
        }
    }
}

/// Where a library resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySourceType {
    Official,
    Community,
    Fork,
    Mirror,
    #[default]
    Unknown,
}

/// Where a repository resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositorySourceType {
    Official,
    Fork,
    #[default]
    Unknown,
}

/// The resolved external target, one variant per record kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedTarget {
    #[serde(rename_all = "camelCase")]
    Library {
        library_id: String,
        source_type: LibrarySourceType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trust_score: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        snippet_count: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    Repository {
        repository: String,
        source_type: RepositorySourceType,
    },
}

impl ResolvedTarget {
    pub fn kind(&self) -> RecordKind {
        match self {
            ResolvedTarget::Library { .. } => RecordKind::Library,
            ResolvedTarget::Repository { .. } => RecordKind::Repository,
        }
    }

    /// The variant-specific identifier (`libraryId` or `repository`)
    pub fn identifier(&self) -> &str {
        match self {
            ResolvedTarget::Library { library_id, .. } => library_id,
            ResolvedTarget::Repository { repository, .. } => repository,
        }
    }

    /// Whether both targets denote the same external resource.
    ///
    /// Library IDs compare exactly; repository names compare case-insensitively
    /// since hosting services treat `Owner/Name` and `owner/name` alike.
    pub fn same_resource(&self, other: &ResolvedTarget) -> bool {
        match (self, other) {
            (
                ResolvedTarget::Library { library_id: a, .. },
                ResolvedTarget::Library { library_id: b, .. },
            ) => a == b,
            (
                ResolvedTarget::Repository { repository: a, .. },
                ResolvedTarget::Repository { repository: b, .. },
            ) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    /// Fill metadata the caller left out from a previous resolution of the
    /// same kind. `keep_source_type` is set when the new input carried no
    /// source type of its own.
    pub(crate) fn inherit_missing(&mut self, previous: &ResolvedTarget, keep_source_type: bool) {
        match (self, previous) {
            (
                ResolvedTarget::Library {
                    source_type,
                    trust_score,
                    snippet_count,
                    ..
                },
                ResolvedTarget::Library {
                    source_type: prev_source,
                    trust_score: prev_trust,
                    snippet_count: prev_snippets,
                    ..
                },
            ) => {
                if keep_source_type {
                    *source_type = *prev_source;
                }
                if trust_score.is_none() {
                    *trust_score = *prev_trust;
                }
                if snippet_count.is_none() {
                    *snippet_count = *prev_snippets;
                }
            }
            (
                ResolvedTarget::Repository { source_type, .. },
                ResolvedTarget::Repository {
                    source_type: prev_source,
                    ..
                },
            ) => {
                if keep_source_type {
                    *source_type = *prev_source;
                }
            }
            _ => {}
        }
    }
}

/// A cached resolution as handed out to callers.
///
/// Records are always copies; mutating one never affects the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Canonical name first, aliases after; unique case-insensitively
    pub names: Vec<String>,
    #[serde(flatten)]
    pub target: ResolvedTarget,
    /// Last confirmed external resolution
    pub resolved_at: DateTime<Utc>,
    /// Last read or write through the store
    pub last_accessed_at: DateTime<Utc>,
    /// Last write through the store
    pub updated_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn kind(&self) -> RecordKind {
        self.target.kind()
    }

    pub fn identifier(&self) -> &str {
        self.target.identifier()
    }

    /// The display name the entry is keyed by
    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Names other than the canonical one
    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or_default()
    }

    /// Normalized primary key
    pub fn key(&self) -> String {
        normalize(self.canonical_name())
    }

    /// Case-insensitive membership test over all names
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| same_name(n, name))
    }

    /// Whether any of `names` is also one of this record's names
    pub fn shares_name(&self, names: &[String]) -> bool {
        names.iter().any(|n| self.has_name(n))
    }

    pub fn trust_score(&self) -> Option<f64> {
        match &self.target {
            ResolvedTarget::Library { trust_score, .. } => *trust_score,
            ResolvedTarget::Repository { .. } => None,
        }
    }
}
