//! Entry store and alias index
//!
//! [`ResolutionIndex`] holds no lock of its own. It is only ever touched through
//! the store's gate, so every method here sees and leaves a consistent state.

use super::entry::CacheEntry;
use super::normalize::{normalize, same_name};
use super::observer::CacheEvent;
use super::record::{CacheRecord, RecordKind};
use super::snapshot::{SnapshotEntry, project};
use super::stats::CacheStats;
use super::validation::ValidatedInput;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Result of a single upsert
#[derive(Debug)]
pub(crate) struct UpsertOutcome {
    pub record: CacheRecord,
    /// A new key was inserted (as opposed to an existing resource updated)
    pub created: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ResolutionIndex {
    /// Canonical key -> entry
    entries: HashMap<String, CacheEntry>,
    /// Normalized alias -> canonical key of the owning entry
    aliases: HashMap<String, String>,
    tick: u64,
    stats: CacheStats,
}

impl ResolutionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub(super) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    pub(super) fn entries(&self) -> &HashMap<String, CacheEntry> {
        &self.entries
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Resolve a term to a canonical key: direct key first, then alias
    pub fn resolve_key(&self, term: &str) -> Option<String> {
        let normalized = normalize(term);
        if self.entries.contains_key(&normalized) {
            return Some(normalized);
        }
        self.aliases.get(&normalized).cloned()
    }

    /// Look up by key or alias, refreshing recency on a hit
    pub fn get(
        &mut self,
        term: &str,
        now: DateTime<Utc>,
        events: &mut Vec<CacheEvent>,
    ) -> Option<CacheRecord> {
        let key = self.resolve_key(term);
        let tick = self.next_tick();

        if let Some((key, entry)) = key.and_then(|k| self.entries.get_mut(&k).map(|e| (k, e))) {
            entry.touch(now, tick);
            let record = entry.record.clone();
            self.stats.hits += 1;
            events.push(CacheEvent::Hit {
                term: term.to_string(),
                key,
            });
            return Some(record);
        }

        self.stats.misses += 1;
        events.push(CacheEvent::Miss {
            term: term.to_string(),
        });
        None
    }

    /// Insert or update a validated resolution.
    ///
    /// The caller is responsible for running capacity enforcement when the
    /// outcome reports a newly created key.
    pub fn upsert(
        &mut self,
        input: ValidatedInput,
        now: DateTime<Utc>,
        merge_on_names: bool,
        events: &mut Vec<CacheEvent>,
    ) -> UpsertOutcome {
        let key = input.key();
        let kind = input.target.kind();
        let matched = self.find_same_resource(&key, &input, merge_on_names);
        let tick = self.next_tick();

        let ValidatedInput {
            mut names,
            mut target,
            resolved_at,
            source_type_omitted,
        } = input;
        let mut inserted_seq = tick;
        // A key match of the other kind is replaced outright and counts as new
        let mut created = true;

        if let Some(matched_key) = matched {
            if let Some(previous) = self.remove_entry(&matched_key) {
                if previous.record.kind() == kind {
                    created = false;
                    inserted_seq = previous.inserted_seq;
                    target.inherit_missing(&previous.record.target, source_type_omitted);
                    merge_names(&mut names, &previous.record.names);

                    if matched_key != key {
                        events.push(CacheEvent::Merged {
                            kind,
                            from_key: matched_key,
                            into_key: key.clone(),
                            from_identifier: previous.record.identifier().to_string(),
                            into_identifier: target.identifier().to_string(),
                        });
                    }
                }
            }
        }

        // Any other entry still pointing at the same target is the same resource.
        let mut duplicates: Vec<(u64, String)> = self
            .entries
            .iter()
            .filter(|(k, e)| **k != key && e.record.target.same_resource(&target))
            .map(|(k, e)| (e.inserted_seq, k.clone()))
            .collect();
        duplicates.sort();
        for (_, duplicate_key) in duplicates {
            if let Some(duplicate) = self.remove_entry(&duplicate_key) {
                merge_names(&mut names, &duplicate.record.names);
                events.push(CacheEvent::Merged {
                    kind,
                    from_key: duplicate_key,
                    into_key: key.clone(),
                    from_identifier: duplicate.record.identifier().to_string(),
                    into_identifier: target.identifier().to_string(),
                });
            }
        }

        self.drop_shadowed_aliases(&key, &mut names, events);
        self.claim_names(&key, &names, events);

        let record = CacheRecord {
            names,
            target,
            resolved_at,
            last_accessed_at: now,
            updated_at: now,
        };
        for alias in record.aliases() {
            self.aliases.insert(normalize(alias), key.clone());
        }

        let mut entry = CacheEntry::new(record.clone(), tick);
        entry.inserted_seq = inserted_seq;
        self.entries.insert(key, entry);

        if created {
            self.stats.inserts += 1;
        } else {
            self.stats.updates += 1;
        }

        events.push(CacheEvent::Upserted {
            kind,
            search_term: record.canonical_name().to_string(),
            identifier: record.identifier().to_string(),
            created,
        });

        UpsertOutcome { record, created }
    }

    /// Remove the entry reached by `term`
    pub fn invalidate(&mut self, term: &str, events: &mut Vec<CacheEvent>) -> bool {
        let Some(key) = self.resolve_key(term) else {
            return false;
        };
        let removed = self.remove_entry(&key).is_some();
        if removed {
            events.push(CacheEvent::Invalidated { key });
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.aliases.clear();
    }

    pub fn snapshot(&self, limit: usize, kind: Option<RecordKind>) -> Vec<SnapshotEntry> {
        project(self.entries.values(), limit, kind)
    }

    /// Remove an entry together with every alias pointing at it
    pub(super) fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key)?;
        self.aliases.retain(|_, owner| owner.as_str() != key);
        Some(removed)
    }

    /// Find the existing entry that represents the same resource as `input`.
    ///
    /// Priority: the canonical key itself, then a same-kind entry with the same
    /// identifier, then (when enabled) a same-kind entry sharing a name. Among
    /// several candidates of one rule the earliest inserted wins.
    fn find_same_resource(
        &self,
        key: &str,
        input: &ValidatedInput,
        merge_on_names: bool,
    ) -> Option<String> {
        if self.entries.contains_key(key) {
            return Some(key.to_string());
        }

        let by_identifier = self
            .entries
            .iter()
            .filter(|(_, e)| e.record.target.same_resource(&input.target))
            .min_by_key(|(_, e)| e.inserted_seq)
            .map(|(k, _)| k.clone());
        if by_identifier.is_some() {
            return by_identifier;
        }

        if !merge_on_names {
            return None;
        }

        let kind = input.target.kind();
        self.entries
            .iter()
            .filter(|(_, e)| e.record.kind() == kind && e.record.shares_name(&input.names))
            .min_by_key(|(_, e)| e.inserted_seq)
            .map(|(k, _)| k.clone())
    }

    /// Drop aliases that are another entry's canonical key.
    ///
    /// Direct keys win over aliases on lookup, so such an alias could never
    /// reach this record.
    fn drop_shadowed_aliases(
        &self,
        key: &str,
        names: &mut Vec<String>,
        events: &mut Vec<CacheEvent>,
    ) {
        let mut kept = Vec::with_capacity(names.len());
        for (position, name) in names.drain(..).enumerate() {
            let alias = normalize(&name);
            if position > 0 && alias != key && self.entries.contains_key(&alias) {
                events.push(CacheEvent::AliasShadowed {
                    alias,
                    key: key.to_string(),
                });
                continue;
            }
            kept.push(name);
        }
        *names = kept;
    }

    /// Take over aliases that other entries hold for any of `names`
    fn claim_names(&mut self, key: &str, names: &[String], events: &mut Vec<CacheEvent>) {
        for name in names {
            let alias = normalize(name);
            let Some(owner) = self.aliases.get(&alias).cloned() else {
                continue;
            };
            if owner == key {
                continue;
            }

            self.aliases.remove(&alias);
            if let Some(entry) = self.entries.get_mut(&owner) {
                entry.record.names.retain(|n| !same_name(n, &alias));
            }
            events.push(CacheEvent::AliasMoved {
                alias,
                from_key: owner,
                to_key: key.to_string(),
            });
        }
    }
}

/// Append names from `previous` that `names` does not already contain
fn merge_names(names: &mut Vec<String>, previous: &[String]) {
    for name in previous {
        if !names.iter().any(|n| same_name(n, name)) {
            names.push(name.clone());
        }
    }
}
