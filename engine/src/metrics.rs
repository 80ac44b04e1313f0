//! Session metrics: pause-aware elapsed time, WPM, and accuracy.
//!
//! Pure math over timestamps supplied by the caller. The presentation
//! layer polls these while a test is running and once more at completion
//! to produce the `(wpm, accuracy)` pair handed to the sync engine.

use crate::TimestampMs;
use serde::{Deserialize, Serialize};

/// Characters per "word" in the standard WPM formula.
const CHARS_PER_WORD: f64 = 5.0;

/// Timing state for one typing session.
///
/// Tracks when the session started and how much of the wall-clock time was
/// spent paused, so elapsed time reflects active typing only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTimer {
    /// Whether a session is running
    pub active: bool,
    /// When the session started
    pub start_time: Option<TimestampMs>,
    /// Whether the session is currently paused
    pub paused: bool,
    /// When the current pause began, if paused
    pub pause_start_time: Option<TimestampMs>,
    /// Total time spent in completed pauses
    pub total_paused_ms: u64,
}

impl SessionTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session at `now`.
    pub fn start(&mut self, now: TimestampMs) {
        self.active = true;
        self.start_time = Some(now);
        self.paused = false;
        self.pause_start_time = None;
        self.total_paused_ms = 0;
    }

    /// Pause the session. No effect if already paused or not running.
    pub fn pause(&mut self, now: TimestampMs) {
        if self.active && !self.paused {
            self.paused = true;
            self.pause_start_time = Some(now);
        }
    }

    /// Resume from a pause, folding the pause duration into the total.
    pub fn resume(&mut self, now: TimestampMs) {
        if self.paused {
            if let Some(pause_start) = self.pause_start_time {
                self.total_paused_ms += now.saturating_sub(pause_start);
            }
            self.paused = false;
            self.pause_start_time = None;
        }
    }

    /// End the session.
    pub fn stop(&mut self, now: TimestampMs) {
        self.resume(now);
        self.active = false;
    }

    /// Elapsed active time in seconds, excluding pauses.
    ///
    /// While paused, the in-progress pause is excluded too, so the value
    /// is stable for the duration of the pause. Returns 0 for an idle
    /// timer.
    pub fn elapsed_seconds(&self, now: TimestampMs) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        if !self.active {
            return 0.0;
        }

        let mut elapsed_ms = now.saturating_sub(start).saturating_sub(self.total_paused_ms);

        if self.paused {
            if let Some(pause_start) = self.pause_start_time {
                elapsed_ms = elapsed_ms.saturating_sub(now.saturating_sub(pause_start));
            }
        }

        elapsed_ms as f64 / 1000.0
    }
}

/// Words per minute, using the standard 5-characters-per-word convention.
///
/// Returns 0 when no time has elapsed.
pub fn words_per_minute(chars_typed: u64, elapsed_seconds: f64) -> u32 {
    if elapsed_seconds <= 0.0 {
        return 0;
    }
    let elapsed_minutes = elapsed_seconds / 60.0;
    (chars_typed as f64 / CHARS_PER_WORD / elapsed_minutes).round() as u32
}

/// Accuracy percentage, rounded to the nearest integer.
///
/// An empty session counts as 100%.
pub fn accuracy(total_chars: u64, errors: u64) -> u32 {
    if total_chars == 0 {
        return 100;
    }
    let correct = total_chars.saturating_sub(errors);
    ((correct as f64 / total_chars as f64) * 100.0).round() as u32
}

/// Format elapsed seconds as `M:SS`.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
