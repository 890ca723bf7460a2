//! Streaming one-tick-per-second deduplication.

use chrono::{DateTime, TimeZone};

/// Keeps the first tick observed in each whole second.
///
/// Input is assumed time-ordered, so only the last admitted second needs to
/// be remembered. Seconds are whole epoch seconds of the instant, which
/// matches the local wall-clock second except inside a DST fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickDeduplicator {
    last_second: Option<i64>,
}

impl TickDeduplicator {
    /// Creates a deduplicator that has seen nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_second: None }
    }

    /// Returns true if `timestamp` starts a new second, remembering it.
    pub fn admit<Tz: TimeZone>(&mut self, timestamp: &DateTime<Tz>) -> bool {
        let second = timestamp.timestamp();
        if self.last_second == Some(second) {
            return false;
        }
        self.last_second = Some(second);
        true
    }

    /// Returns the epoch second of the last admitted tick.
    #[must_use]
    pub const fn last_second(&self) -> Option<i64> {
        self.last_second
    }

    /// Forgets the last admitted second.
    pub const fn reset(&mut self) {
        self.last_second = None;
    }
}
