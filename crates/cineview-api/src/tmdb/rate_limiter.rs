//! TMDB API rate limiter.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Slot-reservation rate limiter for the TMDB API.
///
/// TMDB enforces roughly 40 requests per second. Each caller reserves the
/// next free start slot and sleeps until that slot outside the lock, so a burst
/// of concurrent lookups (e.g. one profile image per cast member) is
/// staggered instead of serialized behind a held mutex.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between request starts.
    min_interval: Duration,
    /// Earliest instant at which the next request may start.
    next_slot: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Reserves a start slot and returns how long the caller must wait for it.
    pub fn reserve(&mut self, now: Instant) -> Duration {
        let slot = match self.next_slot {
            Some(next) if next > now => next,
            _ => now,
        };
        self.next_slot = slot.checked_add(self.min_interval);
        slot.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use std::time::Duration;

    use super::*;

    #[test]
    fn test_first_reservation_is_immediate() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_secs(1));

        // Act
        let delay = limiter.reserve(Instant::now());

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_back_to_back_reservations_are_staggered() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));
        let now = Instant::now();

        // Act
        let first = limiter.reserve(now);
        let second = limiter.reserve(now);
        let third = limiter.reserve(now);

        // Assert
        assert_eq!(first, Duration::ZERO);
        assert_eq!(second, Duration::from_millis(50));
        assert_eq!(third, Duration::from_millis(100));
    }

    #[test]
    fn test_idle_limiter_does_not_accumulate_debt() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();
        limiter.reserve(start);

        // Act: next request arrives long after the reserved slot
        let later = start + Duration::from_secs(1);
        let delay = limiter.reserve(later);

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_zero_interval_never_waits() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(0));
        let now = Instant::now();

        // Act
        limiter.reserve(now);
        let delay = limiter.reserve(now);

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let limiter = TmdbRateLimiter::default_interval();

        // Assert
        assert_eq!(limiter.min_interval, Duration::from_millis(25));
    }
}
