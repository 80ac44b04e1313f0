//! Per-snippet performance records and their merge rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Performance statistics for one practiced snippet.
///
/// All numeric fields are monotonically non-decreasing across updates and
/// merges, and `last_practiced` only ever moves forward. That makes the
/// record safe to combine from any two replicas without versioning: the
/// field-wise merge ([`SnippetStat::merged_with`]) is commutative,
/// associative, and idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetStat {
    /// Best words-per-minute achieved on this snippet
    #[serde(rename = "bestWPM")]
    pub best_wpm: u32,
    /// Best accuracy percentage (0-100) achieved on this snippet
    pub best_accuracy: u32,
    /// Number of practice attempts
    pub practice_count: u64,
    /// When the snippet was last practiced (ISO-8601 on the wire)
    pub last_practiced: DateTime<Utc>,
}

impl SnippetStat {
    /// Seed a record for the first attempt at a snippet.
    pub fn first_attempt(wpm: u32, accuracy: u32, now: DateTime<Utc>) -> Self {
        Self {
            best_wpm: wpm,
            best_accuracy: accuracy,
            practice_count: 1,
            last_practiced: now,
        }
    }

    /// Fold another attempt into this record.
    ///
    /// Bests only improve; the count and timestamp always advance.
    pub fn record_attempt(&mut self, wpm: u32, accuracy: u32, now: DateTime<Utc>) {
        self.best_wpm = self.best_wpm.max(wpm);
        self.best_accuracy = self.best_accuracy.max(accuracy);
        self.practice_count += 1;
        self.last_practiced = now;
    }

    /// Field-wise merge with another observation of the same snippet.
    ///
    /// Takes the maximum of each numeric field and the later of the two
    /// timestamps. On equal instants the local (`self`) value is kept,
    /// which breaks ties deterministically.
    pub fn merged_with(&self, other: &SnippetStat) -> SnippetStat {
        SnippetStat {
            best_wpm: self.best_wpm.max(other.best_wpm),
            best_accuracy: self.best_accuracy.max(other.best_accuracy),
            practice_count: self.practice_count.max(other.practice_count),
            last_practiced: if other.last_practiced > self.last_practiced {
                other.last_practiced
            } else {
                self.last_practiced
            },
        }
    }

    /// Check that this record dominates another field by field.
    ///
    /// Holds for any merge result against either of its inputs.
    pub fn dominates(&self, other: &SnippetStat) -> bool {
        self.best_wpm >= other.best_wpm
            && self.best_accuracy >= other.best_accuracy
            && self.practice_count >= other.practice_count
            && self.last_practiced >= other.last_practiced
    }
}
