//! # TreeType Engine
//!
//! Deterministic core logic for TreeType, a code-typing practice app.
//!
//! This crate holds everything that can be computed without touching the
//! outside world: per-snippet performance records and their merge rules,
//! session metrics math, and the token-exclusion presets that decide what
//! the user actually types. Persistence and cloud sync live in the
//! `treetype-sync` crate, which drives this one.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or platform
//! - **Deterministic**: the same inputs always produce the same outputs;
//!   "now" is always a parameter, never read from a clock
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Snippet stats
//!
//! A [`SnippetStat`] tracks one practiced snippet: best WPM, best accuracy,
//! practice count, and the last-practiced instant. Every field is
//! monotonic-merge-safe: combining two observations of the same snippet
//! takes the maximum of each numeric field and the later timestamp, so a
//! merge can never lose progress.
//!
//! ### Stats collection
//!
//! A [`StatsCollection`] maps snippet ids to their stats. It serializes
//! deterministically and knows how to merge a remote snapshot into a local
//! one ([`StatsCollection::merge_remote`]), reporting which entries changed
//! so the caller can decide whether to persist.
//!
//! ### Metrics
//!
//! The [`metrics`] module computes elapsed active time (excluding pauses),
//! words per minute, and accuracy from raw session state.
//!
//! ### Token exclusion
//!
//! The [`exclusion`] module filters a line of categorized tokens through a
//! named preset and regenerates the contiguous typing sequence plus the
//! char-index-to-token map.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use treetype_engine::StatsCollection;
//!
//! let mut stats = StatsCollection::new();
//! let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
//!
//! // First attempt seeds the record.
//! stats.record_practice("fib.py:3", 70, 92, now);
//!
//! // A slower attempt still bumps the count but keeps the best WPM.
//! let later = now + chrono::Duration::minutes(5);
//! let stat = stats.record_practice("fib.py:3", 55, 96, later);
//! assert_eq!(stat.best_wpm, 70);
//! assert_eq!(stat.best_accuracy, 96);
//! assert_eq!(stat.practice_count, 2);
//! ```

pub mod collection;
pub mod error;
pub mod exclusion;
pub mod metrics;
pub mod stat;

// Re-export main types at crate root
pub use collection::{MergeReport, StatsCollection};
pub use error::Error;
pub use exclusion::{CharRef, Line, Preset, Token, TokenCategory, TypingMode, UserConfig};
pub use metrics::SessionTimer;
pub use stat::SnippetStat;

/// Type aliases for clarity
pub type SnippetId = String;
pub type UserId = String;
/// Milliseconds since the Unix epoch, as handed over by the UI layer.
pub type TimestampMs = u64;
