//! Session accumulator for keystroke timing data.
//!
//! A [`Session`] is one bounded typing attempt: it starts with the first
//! observed key event and ends with an analysis request or an explicit reset.
//! The recorder keeps only timing and edit signals, never typed content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accumulated timing and edit state for one typing attempt.
///
/// Fields are private so the recorder's invariants hold at all times:
/// `pauses.len() == timestamps.len() == key_count` and
/// `backspace_count <= key_count`. The first key event only marks the session
/// start; it contributes no pause and is not counted as a keystroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Time of the first recorded key event; set exactly once per session
    start_time: Option<DateTime<Utc>>,
    /// Time of the most recently recorded key event
    last_key_time: Option<DateTime<Utc>>,
    /// Counted key events (excludes the session-initializing first event)
    key_count: u64,
    /// Counted deletion key events (subset of key_count)
    backspace_count: u64,
    /// Inter-key gaps in milliseconds, one per counted event
    pauses: Vec<i64>,
    /// Absolute event times, retained for future feature use
    timestamps: Vec<DateTime<Utc>>,
}

/// Continuously-displayed statistics for a live, possibly-empty session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    /// Length of the typed text, as reported by the input surface
    pub char_count: usize,
    /// Counted key events per elapsed second, 0 while nothing is counted
    pub typing_speed_estimate: f64,
    /// Deletion key events so far
    pub backspace_count: u64,
}

impl Session {
    /// Create an empty session with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed key-down event at time `now`.
    ///
    /// The first event of a session sets `start_time` and `last_key_time` and
    /// nothing else. Every later event appends the gap since the previous
    /// event, bumps the counters, and advances `last_key_time`. Always
    /// succeeds; mutates only the session.
    pub fn record_key_event(&mut self, is_deletion: bool, now: DateTime<Utc>) {
        let Some(last) = self.last_key_time else {
            self.start_time = Some(now);
            self.last_key_time = Some(now);
            return;
        };

        let pause = (now - last).num_milliseconds();
        self.pauses.push(pause);
        if is_deletion {
            self.backspace_count += 1;
        }
        self.key_count += 1;
        self.timestamps.push(now);
        self.last_key_time = Some(now);
    }

    /// Atomically replace this session with a fresh empty one. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether a first key event has been recorded.
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Time of the first recorded key event, if any.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Time of the most recently recorded key event, if any.
    pub fn last_key_time(&self) -> Option<DateTime<Utc>> {
        self.last_key_time
    }

    /// Counted key events (the session-initializing event is excluded).
    pub fn key_count(&self) -> u64 {
        self.key_count
    }

    /// Counted deletion key events.
    pub fn backspace_count(&self) -> u64 {
        self.backspace_count
    }

    /// Inter-key gaps in milliseconds, in arrival order.
    pub fn pauses(&self) -> &[i64] {
        &self.pauses
    }

    /// Absolute times of counted key events, in arrival order.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Seconds elapsed since the session started, if it has.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<f64> {
        self.start_time
            .map(|start| (now - start).num_milliseconds() as f64 / 1000.0)
    }

    /// Statistics for continuous display against the live session.
    ///
    /// Uses the same speed formula as feature extraction but tolerates an
    /// empty or degenerate session by reporting 0. Kept as a separate call
    /// site from extraction on purpose.
    pub fn live_stats(&self, char_count: usize, now: DateTime<Utc>) -> LiveStats {
        let typing_speed_estimate = match self.elapsed_seconds(now) {
            Some(elapsed) if self.key_count > 0 && elapsed > 0.0 => {
                self.key_count as f64 / elapsed
            }
            _ => 0.0,
        };

        LiveStats {
            char_count,
            typing_speed_estimate,
            backspace_count: self.backspace_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(base: DateTime<Utc>, offset_ms: i64) -> DateTime<Utc> {
        base + Duration::milliseconds(offset_ms)
    }

    #[test]
    fn test_first_event_is_start_marker() {
        let base = Utc::now();
        let mut session = Session::new();

        session.record_key_event(false, base);

        assert_eq!(session.start_time(), Some(base));
        assert_eq!(session.last_key_time(), Some(base));
        assert_eq!(session.key_count(), 0);
        assert!(session.pauses().is_empty());
        assert!(session.timestamps().is_empty());
    }

    #[test]
    fn test_counts_and_lengths_stay_consistent() {
        let base = Utc::now();
        let mut session = Session::new();

        for i in 0..10 {
            session.record_key_event(i % 3 == 0, at(base, i * 80));
            assert_eq!(session.pauses().len() as u64, session.key_count());
            assert_eq!(session.timestamps().len() as u64, session.key_count());
            assert!(session.backspace_count() <= session.key_count());
        }

        // 10 events, first is the start marker
        assert_eq!(session.key_count(), 9);
    }

    #[test]
    fn test_pause_sequence_scenario() {
        // Events at 0, 100, 250, 400 ms, no deletions
        let base = Utc::now();
        let mut session = Session::new();
        for offset in [0, 100, 250, 400] {
            session.record_key_event(false, at(base, offset));
        }

        assert_eq!(session.pauses(), &[100, 150, 150]);
        assert_eq!(session.key_count(), 3);
        assert_eq!(session.backspace_count(), 0);
    }

    #[test]
    fn test_deletion_key_is_counted_separately() {
        let base = Utc::now();
        let mut session = Session::new();
        session.record_key_event(false, at(base, 0));
        session.record_key_event(false, at(base, 100));
        session.record_key_event(true, at(base, 250));
        session.record_key_event(false, at(base, 400));

        assert_eq!(session.backspace_count(), 1);
        assert_eq!(session.key_count(), 3);
    }

    #[test]
    fn test_reset_yields_fresh_session() {
        let base = Utc::now();
        let mut session = Session::new();
        session.record_key_event(false, at(base, 0));
        session.record_key_event(true, at(base, 120));

        session.reset();
        assert_eq!(session, Session::new());

        // Reset is idempotent
        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_first_event_after_reset_starts_new_session() {
        let base = Utc::now();
        let mut session = Session::new();
        session.record_key_event(false, at(base, 0));
        session.record_key_event(false, at(base, 100));
        session.reset();

        let restart = at(base, 5_000);
        session.record_key_event(false, restart);

        assert_eq!(session.start_time(), Some(restart));
        assert_eq!(session.key_count(), 0);
        assert!(session.pauses().is_empty());
    }

    #[test]
    fn test_live_stats_empty_session() {
        let session = Session::new();
        let stats = session.live_stats(0, Utc::now());

        assert_eq!(stats.char_count, 0);
        assert_eq!(stats.typing_speed_estimate, 0.0);
        assert_eq!(stats.backspace_count, 0);
    }

    #[test]
    fn test_live_stats_zero_elapsed_guard() {
        let base = Utc::now();
        let mut session = Session::new();
        session.record_key_event(false, base);
        session.record_key_event(false, base);

        // Two events at the same instant: counted key but no elapsed time
        let stats = session.live_stats(2, base);
        assert_eq!(stats.typing_speed_estimate, 0.0);
    }

    #[test]
    fn test_live_stats_speed_estimate() {
        let base = Utc::now();
        let mut session = Session::new();
        for offset in [0, 100, 250, 400] {
            session.record_key_event(false, at(base, offset));
        }

        let stats = session.live_stats(3, at(base, 400));
        assert!((stats.typing_speed_estimate - 7.5).abs() < 1e-9);
        assert_eq!(stats.char_count, 3);
    }
}
