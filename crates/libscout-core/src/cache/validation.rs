//! Upsert inputs and their schema validation

use super::normalize::normalize;
use super::record::{LibrarySourceType, RecordKind, RepositorySourceType, ResolvedTarget};
use crate::error::{ScoutError, ScoutResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Highest accepted trust score
pub const MAX_TRUST_SCORE: f64 = 10.0;

/// Names supplied by the caller.
///
/// The canonical name is `search_term` when present, otherwise the first entry
/// of `names`; everything after it becomes an alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl NameInput {
    fn ordered(&self) -> impl Iterator<Item = &String> {
        self.search_term
            .iter()
            .chain(self.names.iter())
            .chain(self.aliases.iter())
    }
}

/// Library resolution reported by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInput {
    #[serde(flatten)]
    pub names: NameInput,
    #[serde(default)]
    pub library_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<LibrarySourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_count: Option<i64>,
    /// RFC 3339 timestamp; defaults to now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

impl LibraryInput {
    pub fn new(search_term: impl Into<String>, library_id: impl Into<String>) -> Self {
        Self {
            names: NameInput {
                search_term: Some(search_term.into()),
                ..NameInput::default()
            },
            library_id: library_id.into(),
            ..Self::default()
        }
    }

    /// Build from an explicit ordered name list
    pub fn with_names<I, S>(names: I, library_id: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: NameInput {
                names: names.into_iter().map(Into::into).collect(),
                ..NameInput::default()
            },
            library_id: library_id.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.aliases.push(alias.into());
        self
    }

    pub fn source_type(mut self, source_type: LibrarySourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn trust_score(mut self, trust_score: f64) -> Self {
        self.trust_score = Some(trust_score);
        self
    }

    pub fn snippet_count(mut self, snippet_count: i64) -> Self {
        self.snippet_count = Some(snippet_count);
        self
    }

    pub fn resolved_at(mut self, resolved_at: impl Into<String>) -> Self {
        self.resolved_at = Some(resolved_at.into());
        self
    }
}

/// Repository resolution reported by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInput {
    #[serde(flatten)]
    pub names: NameInput,
    #[serde(default)]
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<RepositorySourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

impl RepositoryInput {
    pub fn new(search_term: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            names: NameInput {
                search_term: Some(search_term.into()),
                ..NameInput::default()
            },
            repository: repository.into(),
            ..Self::default()
        }
    }

    pub fn with_names<I, S>(names: I, repository: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: NameInput {
                names: names.into_iter().map(Into::into).collect(),
                ..NameInput::default()
            },
            repository: repository.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.aliases.push(alias.into());
        self
    }

    pub fn source_type(mut self, source_type: RepositorySourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn resolved_at(mut self, resolved_at: impl Into<String>) -> Self {
        self.resolved_at = Some(resolved_at.into());
        self
    }
}

/// Input to `upsert`, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UpsertInput {
    Library(LibraryInput),
    Repository(RepositoryInput),
}

impl UpsertInput {
    pub fn kind(&self) -> RecordKind {
        match self {
            UpsertInput::Library(_) => RecordKind::Library,
            UpsertInput::Repository(_) => RecordKind::Repository,
        }
    }

    /// Parse a JSON payload as produced by a resolution agent
    pub fn from_json(payload: &str) -> ScoutResult<Self> {
        serde_json::from_str(payload)
            .map_err(|e| ScoutError::validation("input", format!("malformed upsert payload: {}", e)))
    }
}

impl From<LibraryInput> for UpsertInput {
    fn from(input: LibraryInput) -> Self {
        UpsertInput::Library(input)
    }
}

impl From<RepositoryInput> for UpsertInput {
    fn from(input: RepositoryInput) -> Self {
        UpsertInput::Repository(input)
    }
}

/// An input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedInput {
    /// Trimmed, non-blank, case-insensitively unique; never empty
    pub names: Vec<String>,
    pub target: ResolvedTarget,
    pub resolved_at: DateTime<Utc>,
    /// The caller left the source type out
    pub source_type_omitted: bool,
}

impl ValidatedInput {
    pub fn key(&self) -> String {
        normalize(&self.names[0])
    }
}

/// Validate an upsert input, defaulting `resolved_at` to `now`
pub(crate) fn validate(input: UpsertInput, now: DateTime<Utc>) -> ScoutResult<ValidatedInput> {
    match input {
        UpsertInput::Library(input) => {
            let names = clean_names(&input.names)?;
            let library_id = required("libraryId", &input.library_id)?;

            if let Some(score) = input.trust_score {
                if !score.is_finite() || !(0.0..=MAX_TRUST_SCORE).contains(&score) {
                    return Err(ScoutError::validation(
                        "trustScore",
                        format!("must be between 0 and {}, got {}", MAX_TRUST_SCORE, score),
                    ));
                }
            }

            let snippet_count = match input.snippet_count {
                Some(count) => Some(u64::try_from(count).map_err(|_| {
                    ScoutError::validation(
                        "snippetCount",
                        format!("must be non-negative, got {}", count),
                    )
                })?),
                None => None,
            };

            Ok(ValidatedInput {
                names,
                target: ResolvedTarget::Library {
                    library_id,
                    source_type: input.source_type.unwrap_or_default(),
                    trust_score: input.trust_score,
                    snippet_count,
                },
                resolved_at: parse_resolved_at(input.resolved_at.as_deref(), now)?,
                source_type_omitted: input.source_type.is_none(),
            })
        }
        UpsertInput::Repository(input) => {
            let names = clean_names(&input.names)?;
            let repository = required("repository", &input.repository)?;

            Ok(ValidatedInput {
                names,
                target: ResolvedTarget::Repository {
                    repository,
                    source_type: input.source_type.unwrap_or_default(),
                },
                resolved_at: parse_resolved_at(input.resolved_at.as_deref(), now)?,
                source_type_omitted: input.source_type.is_none(),
            })
        }
    }
}

fn clean_names(input: &NameInput) -> ScoutResult<Vec<String>> {
    let mut seen = HashSet::new();
    let names: Vec<String> = input
        .ordered()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(normalize(name)))
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ScoutError::validation(
            "searchTerm",
            "at least one non-blank name is required",
        ));
    }
    Ok(names)
}

fn required(field: &str, value: &str) -> ScoutResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScoutError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

fn parse_resolved_at(value: Option<&str>, now: DateTime<Utc>) -> ScoutResult<DateTime<Utc>> {
    match value {
        None => Ok(now),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| {
                ScoutError::validation("resolvedAt", format!("not an RFC 3339 timestamp: {}", e))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_names_are_cleaned_and_deduplicated() {
        let input = LibraryInput::new("  React ", "/facebook/react")
            .alias("reactjs")
            .alias("REACT")
            .alias("   ")
            .alias("ReactJS ");
        let validated = validate(input.into(), now()).unwrap();

        assert_eq!(validated.names, vec!["React", "reactjs"]);
        assert_eq!(validated.key(), "react");
        assert_eq!(validated.resolved_at, now());
        assert!(validated.source_type_omitted);
    }

    #[test]
    fn test_blank_names_rejected() {
        let input = LibraryInput::with_names(["", "  "], "/facebook/react");
        let err = validate(input.into(), now()).unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, ScoutError::Validation { ref field, .. } if field == "searchTerm"));
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        let err = validate(LibraryInput::new("react", " ").into(), now()).unwrap_err();
        assert!(matches!(err, ScoutError::Validation { ref field, .. } if field == "libraryId"));

        let err = validate(RepositoryInput::new("tokio", "").into(), now()).unwrap_err();
        assert!(matches!(err, ScoutError::Validation { ref field, .. } if field == "repository"));
    }

    #[test]
    fn test_trust_score_bounds() {
        for bad in [-0.1, 10.5, f64::NAN, f64::INFINITY] {
            let input = LibraryInput::new("react", "/facebook/react").trust_score(bad);
            assert!(validate(input.into(), now()).is_err(), "accepted {}", bad);
        }
        for good in [0.0, 7.25, 10.0] {
            let input = LibraryInput::new("react", "/facebook/react").trust_score(good);
            assert!(validate(input.into(), now()).is_ok());
        }
    }

    #[test]
    fn test_negative_snippet_count_rejected() {
        let input = LibraryInput::new("react", "/facebook/react").snippet_count(-1);
        let err = validate(input.into(), now()).unwrap_err();
        assert!(matches!(err, ScoutError::Validation { ref field, .. } if field == "snippetCount"));
    }

    #[test]
    fn test_resolved_at_parsing() {
        let input = RepositoryInput::new("tokio", "tokio-rs/tokio")
            .resolved_at("2024-05-01T08:30:00+02:00");
        let validated = validate(input.into(), now()).unwrap();
        assert_eq!(validated.resolved_at.to_rfc3339(), "2024-05-01T06:30:00+00:00");

        let input = RepositoryInput::new("tokio", "tokio-rs/tokio").resolved_at("yesterday");
        let err = validate(input.into(), now()).unwrap_err();
        assert!(matches!(err, ScoutError::Validation { ref field, .. } if field == "resolvedAt"));
    }

    #[test]
    fn test_json_payload() {
        let input = UpsertInput::from_json(
            r#"{
                "kind": "library",
                "searchTerm": "next",
                "aliases": ["nextjs"],
                "libraryId": "/vercel/next.js",
                "sourceType": "official",
                "trustScore": 9.1,
                "snippetCount": 3000
            }"#,
        )
        .unwrap();
        assert_eq!(input.kind(), RecordKind::Library);

        let validated = validate(input, now()).unwrap();
        assert_eq!(validated.names, vec!["next", "nextjs"]);
        assert!(!validated.source_type_omitted);
        assert_eq!(
            validated.target,
            ResolvedTarget::Library {
                library_id: "/vercel/next.js".to_string(),
                source_type: LibrarySourceType::Official,
                trust_score: Some(9.1),
                snippet_count: Some(3000),
            }
        );
    }

    #[test]
    fn test_json_payload_with_unknown_kind() {
        let err = UpsertInput::from_json(r#"{"kind": "package", "searchTerm": "x"}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_repository_source_type_is_narrower() {
        let result = UpsertInput::from_json(
            r#"{"kind": "repository", "searchTerm": "x", "repository": "a/b", "sourceType": "mirror"}"#,
        );
        assert!(result.is_err());
    }
}
