//! The stats collection: all per-snippet records for one user.
//!
//! Uses a `BTreeMap` so the persisted JSON is deterministically ordered,
//! which keeps snapshots diffable and makes idempotence checks trivial.

use crate::error::{Error, Result};
use crate::{SnippetId, SnippetStat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from snippet id to its [`SnippetStat`].
///
/// This is the unit of local persistence: the Local Cache Store reads and
/// writes a whole collection at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsCollection {
    entries: BTreeMap<SnippetId, SnippetStat>,
}

/// What a merge pass changed, relative to the local input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Snippet ids whose local value changed (adopted from remote or
    /// upgraded field-wise). Empty means the local snapshot was already
    /// up to date and does not need to be persisted again.
    pub changed: Vec<SnippetId>,
}

impl MergeReport {
    /// True if at least one local entry changed.
    pub fn local_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

impl StatsCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for a snippet.
    pub fn get(&self, snippet_id: &str) -> Option<&SnippetStat> {
        self.entries.get(snippet_id)
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, snippet_id: impl Into<SnippetId>, stat: SnippetStat) {
        self.entries.insert(snippet_id.into(), stat);
    }

    /// Check whether a snippet has been practiced.
    pub fn contains(&self, snippet_id: &str) -> bool {
        self.entries.contains_key(snippet_id)
    }

    /// Iterate over all records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&SnippetId, &SnippetStat)> {
        self.entries.iter()
    }

    /// Number of practiced snippets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no snippet has been practiced yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply one practice attempt, seeding the record on first occurrence.
    ///
    /// Returns the updated record.
    pub fn record_practice(
        &mut self,
        snippet_id: &str,
        wpm: u32,
        accuracy: u32,
        now: DateTime<Utc>,
    ) -> &SnippetStat {
        self.entries
            .entry(snippet_id.to_string())
            .and_modify(|stat| stat.record_attempt(wpm, accuracy, now))
            .or_insert_with(|| SnippetStat::first_attempt(wpm, accuracy, now))
    }

    /// Merge a remote snapshot into this collection.
    ///
    /// - Entries only in `remote` are adopted verbatim.
    /// - Entries in both are combined field-wise (max of each numeric
    ///   field, later timestamp).
    /// - Entries only in `self` are left untouched.
    ///
    /// The report lists every entry whose local value changed; callers use
    /// it to skip the persistence write on a no-op merge.
    pub fn merge_remote(&mut self, remote: &StatsCollection) -> MergeReport {
        let mut report = MergeReport::default();

        for (snippet_id, remote_stat) in &remote.entries {
            match self.entries.get_mut(snippet_id) {
                Some(local_stat) => {
                    let merged = local_stat.merged_with(remote_stat);
                    if merged != *local_stat {
                        *local_stat = merged;
                        report.changed.push(snippet_id.clone());
                    }
                }
                None => {
                    self.entries.insert(snippet_id.clone(), remote_stat.clone());
                    report.changed.push(snippet_id.clone());
                }
            }
        }

        report
    }

    /// Serialize to JSON with deterministic key ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::CorruptStats(e.to_string()))
    }
}

impl FromIterator<(SnippetId, SnippetStat)> for StatsCollection {
    fn from_iter<I: IntoIterator<Item = (SnippetId, SnippetStat)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
