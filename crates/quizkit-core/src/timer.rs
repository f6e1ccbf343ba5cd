//! Per-question active-time accounting.
//!
//! Authoritative time lives in each response's `active_time_ms` and only
//! changes when the timer is stopped at a navigation boundary. The display
//! estimate is a pure function of `now` so a periodic tick can refresh it
//! as often as it likes without double counting.

use chrono::{DateTime, Utc};

use crate::time::elapsed_ms;

/// The single running interval of an open session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerAccumulator {
    origin: Option<DateTime<Utc>>,
}

impl TimerAccumulator {
    /// Begin timing the active question at `now`.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.origin = Some(now);
    }

    /// Close the running interval and return its length in milliseconds.
    ///
    /// Returns zero when no interval was running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> u64 {
        self.origin
            .take()
            .map(|origin| elapsed_ms(origin, now))
            .unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.origin.is_some()
    }

    /// Accumulated time plus the running interval, for presentation only.
    pub fn display_estimate(&self, accumulated_ms: u64, now: DateTime<Utc>) -> u64 {
        accumulated_ms
            + self
                .origin
                .map(|origin| elapsed_ms(origin, now))
                .unwrap_or(0)
    }
}

/// Format milliseconds as `MM:SS` for the live timer.
pub fn format_clock(total_ms: u64) -> String {
    let seconds = total_ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
