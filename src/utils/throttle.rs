use std::time::{Duration, Instant};

/// Rate-limits repeated calls, keeping one trailing call pending.
///
/// The first call in a while fires immediately; calls arriving within
/// `interval` of the last fire are coalesced into a single trailing call,
/// due once the interval has elapsed.
///
/// The caller provides the current time, so schedules stay deterministic
/// in tests.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: bool,
}

impl Throttle {
    /// Creates a new throttle with the given minimum interval between
    /// calls.
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_fire: None,
            pending: false,
        }
    }

    /// Requests a call.
    ///
    /// Returns `true` if the call should run now. Otherwise the request is
    /// remembered, and a later [`poll`](#method.poll) will return `true`
    /// once the interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.last_fire {
            Some(last) if now.duration_since(last) < self.interval => {
                self.pending = true;
                false
            }
            _ => {
                self.last_fire = Some(now);
                self.pending = false;
                true
            }
        }
    }

    /// Checks whether a coalesced trailing call is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        match self.last_fire {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_fire = Some(now);
                self.pending = false;
                true
            }
        }
    }

    /// Returns `true` if a trailing call is waiting for the interval to
    /// elapse.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::Throttle;
    use std::time::{Duration, Instant};

    #[test]
    fn test_leading_call_fires() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();
        assert!(throttle.tick(start));
    }

    #[test]
    fn test_burst_coalesces_into_one_trailing_call() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();

        assert!(throttle.tick(start));
        for ms in 1..5 {
            assert!(!throttle.tick(start + Duration::from_millis(ms)));
        }

        // Not due yet.
        assert!(!throttle.poll(start + Duration::from_millis(20)));
        // Due exactly once.
        assert!(throttle.poll(start + Duration::from_millis(50)));
        assert!(!throttle.poll(start + Duration::from_millis(51)));
    }

    #[test]
    fn test_no_trailing_call_without_request() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();
        assert!(throttle.tick(start));
        assert!(!throttle.poll(start + Duration::from_millis(100)));
    }
}
