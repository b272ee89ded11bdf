//! Per-client window bookkeeping.

use std::time::{Duration, Instant};

/// Request count for a single client within its current window.
///
/// An entry is created on a client's first request, incremented for every
/// request until `reset_time`, and replaced wholesale (never merged) once the
/// window has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Requests observed in the current window, including the one that
    /// created the entry.
    count: u32,
    /// When the current window ends.
    reset_time: Instant,
}

impl WindowEntry {
    /// Open a new window for a client whose first request arrived at `now`.
    pub fn open(window: Duration, now: Instant) -> Self {
        Self {
            count: 1,
            reset_time: now + window,
        }
    }

    /// Whether this window has ended as of `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_time
    }

    /// Record one more request and return the updated count.
    pub fn record_hit(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Requests observed so far in this window.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// When this window ends.
    pub fn reset_time(&self) -> Instant {
        self.reset_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_counts_first_request() {
        let now = Instant::now();
        let entry = WindowEntry::open(Duration::from_secs(60), now);

        assert_eq!(entry.count(), 1);
        assert_eq!(entry.reset_time(), now + Duration::from_secs(60));
    }

    #[test]
    fn test_record_hit_increments() {
        let mut entry = WindowEntry::open(Duration::from_secs(60), Instant::now());

        assert_eq!(entry.record_hit(), 2);
        assert_eq!(entry.record_hit(), 3);
        assert_eq!(entry.count(), 3);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Instant::now();
        let window = Duration::from_millis(100);
        let entry = WindowEntry::open(window, now);

        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::from_millis(99)));
        // The window is closed at exactly reset_time.
        assert!(entry.is_expired(now + window));
        assert!(entry.is_expired(now + Duration::from_secs(5)));
    }
}
