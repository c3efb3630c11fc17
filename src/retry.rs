//! Retry strategies for failed activities
//!
//! A [`RetryStrategy`] maps an attempt number (and the time of the first
//! attempt) to the delay before the next retry. A zero delay means "stop
//! retrying, fail the action". Strategies compose: the delay behavior of the
//! cutoff combinators is delegated to an inner strategy.
//!
//! Delays must be deterministic: a decision pass that recomputes the same
//! attempt over the same history must schedule the identical backoff timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Computes the delay before the next retry of a failed activity.
///
/// `attempt` is 1-based: the first failure asks for attempt 1. `first_start`
/// is the timestamp the action first started executing, used by elapsed-time
/// cutoffs.
pub trait RetryStrategy: Send + Sync {
    /// Delay before the next retry, or [`Duration::ZERO`] to stop retrying.
    fn next_retry(&self, attempt: u64, first_start: DateTime<Utc>) -> Duration;
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn next_retry(&self, _attempt: u64, _first_start: DateTime<Utc>) -> Duration {
        Duration::ZERO
    }
}

/// The same delay between every retry.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl RetryStrategy for FixedDelay {
    fn next_retry(&self, _attempt: u64, _first_start: DateTime<Utc>) -> Duration {
        self.delay
    }
}

/// Exponentially growing delay: `base * (2^attempt - 1)`.
///
/// Saturates instead of overflowing for large attempt numbers, so the delay
/// caps out rather than wrapping to zero (which would read as "stop").
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDelay {
    base: Duration,
}

impl ExponentialDelay {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl RetryStrategy for ExponentialDelay {
    fn next_retry(&self, attempt: u64, _first_start: DateTime<Utc>) -> Duration {
        let power = 1u64
            .checked_shl(attempt.min(u32::MAX as u64) as u32)
            .map(|p| p - 1)
            .unwrap_or(u64::MAX);
        let factor = u32::try_from(power).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor)
    }
}

/// Delegates to an inner strategy while `attempt <= limit`, then stops.
pub struct MaxAttempts<S> {
    inner: S,
    limit: u64,
}

impl<S: RetryStrategy> MaxAttempts<S> {
    pub fn new(inner: S, limit: u64) -> Self {
        Self { inner, limit }
    }
}

impl<S: RetryStrategy> RetryStrategy for MaxAttempts<S> {
    fn next_retry(&self, attempt: u64, first_start: DateTime<Utc>) -> Duration {
        if attempt <= self.limit {
            self.inner.next_retry(attempt, first_start)
        } else {
            Duration::ZERO
        }
    }
}

/// Delegates to an inner strategy until a maximum time has elapsed since the
/// action first started, then stops. The clock read is the only side effect
/// in this module.
pub struct MaxElapsed<S> {
    inner: S,
    clock: Arc<dyn Clock>,
    max_elapsed: Duration,
}

impl<S: RetryStrategy> MaxElapsed<S> {
    pub fn new(inner: S, clock: Arc<dyn Clock>, max_elapsed: Duration) -> Self {
        Self {
            inner,
            clock,
            max_elapsed,
        }
    }
}

impl<S: RetryStrategy> RetryStrategy for MaxElapsed<S> {
    fn next_retry(&self, attempt: u64, first_start: DateTime<Utc>) -> Duration {
        // A window too large to represent is effectively unbounded.
        let deadline = chrono::Duration::from_std(self.max_elapsed)
            .ok()
            .and_then(|window| first_start.checked_add_signed(window));
        match deadline {
            Some(deadline) if self.clock.now() >= deadline => Duration::ZERO,
            _ => self.inner.next_retry(attempt, first_start),
        }
    }
}

/// A sensible default composition:
/// exponential backoff from one minute, at most 100 attempts, for at most
/// two hours of total elapsed time.
pub fn default_strategy() -> Arc<dyn RetryStrategy> {
    const INITIAL_DELAY: Duration = Duration::from_secs(60);
    const MAX_ATTEMPTS: u64 = 100;
    const MAX_ELAPSED: Duration = Duration::from_secs(2 * 60 * 60);

    Arc::new(MaxElapsed::new(
        MaxAttempts::new(ExponentialDelay::new(INITIAL_DELAY), MAX_ATTEMPTS),
        Arc::new(SystemClock),
        MAX_ELAPSED,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_no_retry() {
        assert_eq!(NoRetry.next_retry(1, start()), Duration::ZERO);
    }

    #[test]
    fn test_fixed_delay() {
        let strategy = FixedDelay::new(Duration::from_secs(5));
        assert_eq!(strategy.next_retry(1, start()), Duration::from_secs(5));
        assert_eq!(strategy.next_retry(17, start()), Duration::from_secs(5));
    }

    #[test]
    fn test_exponential_delay() {
        let strategy = ExponentialDelay::new(Duration::from_secs(1));
        assert_eq!(strategy.next_retry(1, start()), Duration::from_secs(1));
        assert_eq!(strategy.next_retry(2, start()), Duration::from_secs(3));
        assert_eq!(strategy.next_retry(3, start()), Duration::from_secs(7));
        assert_eq!(strategy.next_retry(4, start()), Duration::from_secs(15));
    }

    #[test]
    fn test_exponential_delay_saturates() {
        let strategy = ExponentialDelay::new(Duration::from_secs(60));
        let huge = strategy.next_retry(500, start());
        assert!(huge > Duration::ZERO);
    }

    #[test]
    fn test_max_attempts_composition() {
        let strategy = MaxAttempts::new(ExponentialDelay::new(Duration::from_secs(1)), 3);
        assert_eq!(strategy.next_retry(1, start()), Duration::from_secs(1));
        assert_eq!(strategy.next_retry(2, start()), Duration::from_secs(3));
        assert_eq!(strategy.next_retry(3, start()), Duration::from_secs(7));
        assert_eq!(strategy.next_retry(4, start()), Duration::ZERO);
    }

    #[test]
    fn test_max_elapsed_within_window() {
        let clock = Arc::new(FixedClock(start() + chrono::Duration::minutes(30)));
        let strategy = MaxElapsed::new(
            FixedDelay::new(Duration::from_secs(10)),
            clock,
            Duration::from_secs(60 * 60),
        );
        assert_eq!(strategy.next_retry(5, start()), Duration::from_secs(10));
    }

    #[test]
    fn test_max_elapsed_past_window() {
        let clock = Arc::new(FixedClock(start() + chrono::Duration::hours(3)));
        let strategy = MaxElapsed::new(
            FixedDelay::new(Duration::from_secs(10)),
            clock,
            Duration::from_secs(60 * 60),
        );
        assert_eq!(strategy.next_retry(5, start()), Duration::ZERO);
    }

    #[test]
    fn test_default_strategy_first_attempts() {
        let strategy = default_strategy();
        assert_eq!(strategy.next_retry(1, Utc::now()), Duration::from_secs(60));
        assert_eq!(strategy.next_retry(2, Utc::now()), Duration::from_secs(180));
    }
}
