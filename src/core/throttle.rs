//! Cycle throttle: accept at most one frame per analysis period
//!
//! Frames arrive much faster than the classifier should run. The first
//! frame is accepted; afterwards a frame is accepted only once the period
//! has elapsed since the last accepted one. Rejected frames are skipped.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CycleThrottle {
    period: Duration,
    last_accepted: Option<Instant>,
}

impl CycleThrottle {
    /// Create throttle with the given analysis period
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_accepted: None,
        }
    }

    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    /// Is a new cycle permitted at `now`? Accepting closes the gate again.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let open = match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        };
        if open {
            self.last_accepted = Some(now);
        }
        open
    }

    /// Would a frame be accepted at `now`?
    pub fn is_open(&self, now: Instant) -> bool {
        self.last_accepted
            .map(|last| now.saturating_duration_since(last) >= self.period)
            .unwrap_or(true)
    }

    /// Reopen immediately
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_accepted() {
        let mut throttle = CycleThrottle::from_millis(1000);
        assert!(throttle.try_acquire(Instant::now()));
    }

    #[test]
    fn test_frames_within_period_rejected() {
        let mut throttle = CycleThrottle::from_millis(1000);
        let start = Instant::now();
        assert!(throttle.try_acquire(start));
        assert!(!throttle.try_acquire(start + Duration::from_millis(30)));
        assert!(!throttle.try_acquire(start + Duration::from_millis(999)));
        assert!(throttle.try_acquire(start + Duration::from_millis(1000)));
    }

    #[test]
    fn test_rejected_frames_do_not_extend_period() {
        let mut throttle = CycleThrottle::from_millis(100);
        let start = Instant::now();
        throttle.try_acquire(start);
        throttle.try_acquire(start + Duration::from_millis(90));
        assert!(throttle.try_acquire(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_period_accepts_everything() {
        let mut throttle = CycleThrottle::from_millis(0);
        let now = Instant::now();
        assert!(throttle.try_acquire(now));
        assert!(throttle.try_acquire(now));
    }

    #[test]
    fn test_reset_reopens() {
        let mut throttle = CycleThrottle::from_millis(1000);
        let now = Instant::now();
        throttle.try_acquire(now);
        assert!(!throttle.is_open(now));
        throttle.reset();
        assert!(throttle.is_open(now));
    }
}
