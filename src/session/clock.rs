use std::time::{Duration, Instant};

/// Session time that advances only while the game runs
///
/// Power-up expiry and effect reversals are scheduled against this clock, so
/// pausing freezes every deadline along with the board.
#[derive(Debug, Clone)]
pub struct GameClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl GameClock {
    /// A stopped clock at zero
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: None,
        }
    }

    /// Current session time
    pub fn now(&self) -> Duration {
        match self.running_since {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Start or resume; calling on a running clock does nothing
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Freeze; calling on a stopped clock does nothing
    pub fn pause(&mut self) {
        if let Some(started) = self.running_since.take() {
            self.accumulated += started.elapsed();
        }
    }

    /// Back to zero, stopped
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_stopped_at_zero() {
        let clock = GameClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let mut clock = GameClock::new();
        clock.resume();
        std::thread::sleep(Duration::from_millis(20));
        clock.pause();

        let frozen = clock.now();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.now(), frozen);
    }

    #[test]
    fn test_resume_continues_from_where_it_stopped() {
        let mut clock = GameClock::new();
        clock.resume();
        std::thread::sleep(Duration::from_millis(10));
        clock.pause();
        let first = clock.now();

        clock.resume();
        std::thread::sleep(Duration::from_millis(10));
        assert!(clock.now() >= first + Duration::from_millis(10));
    }

    #[test]
    fn test_pause_twice_is_harmless() {
        let mut clock = GameClock::new();
        clock.resume();
        clock.pause();
        let frozen = clock.now();
        clock.pause();
        assert_eq!(clock.now(), frozen);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_reset() {
        let mut clock = GameClock::new();
        clock.resume();
        std::thread::sleep(Duration::from_millis(5));
        clock.reset();
        assert!(!clock.is_running());
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
