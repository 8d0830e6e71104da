//! Process-wide throttle applied to every authenticated protected request.
//!
//! A thin wrapper over a direct (unkeyed) `governor` limiter: the bucket
//! starts full, regains one permit per `interval` and never holds more than
//! `burst`. One bucket is shared by all clients.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use thiserror::Error;

pub use governor::clock::FakeRelativeClock;

#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("refill interval must be positive")]
    ZeroInterval,

    #[error("bucket capacity must be at least 1")]
    ZeroBurst,
}

// Erases the clock type so production and tests share one `RateLimiter`.
trait Permits: Send + Sync {
    fn try_acquire(&self) -> bool;
}

impl<C> Permits for governor::RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>
where
    C: Clock + Send + Sync,
    C::Instant: Send + Sync,
{
    fn try_acquire(&self) -> bool {
        self.check().is_ok()
    }
}

pub struct RateLimiter {
    interval: Duration,
    burst: u32,
    permits: Box<dyn Permits>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn new(interval: Duration, burst: u32) -> Result<Self, LimiterError> {
        Self::with_clock(interval, burst, &DefaultClock::default())
    }

    /// Builds the limiter on an explicit clock. Pass a `FakeRelativeClock` and
    /// keep a clone of it to step time by hand.
    pub fn with_clock<C>(interval: Duration, burst: u32, clock: &C) -> Result<Self, LimiterError>
    where
        C: Clock + Send + Sync + 'static,
        C::Instant: Send + Sync,
    {
        let capacity = NonZeroU32::new(burst).ok_or(LimiterError::ZeroBurst)?;
        let quota = Quota::with_period(interval)
            .ok_or(LimiterError::ZeroInterval)?
            .allow_burst(capacity);

        Ok(Self {
            interval,
            burst,
            permits: Box::new(governor::RateLimiter::direct_with_clock(quota, clock)),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Takes one permit if available. Never blocks on time.
    pub fn allow(&self) -> bool {
        self.permits.try_acquire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn limiter(interval: Duration, burst: u32) -> (RateLimiter, FakeRelativeClock) {
        let clock = FakeRelativeClock::default();
        let limiter = RateLimiter::with_clock(interval, burst, &clock).unwrap();
        (limiter, clock)
    }

    #[test]
    fn one_permit_per_interval() {
        let (limiter, clock) = limiter(Duration::from_secs(2), 1);

        assert!(limiter.allow());
        assert!(!limiter.allow());

        clock.advance(Duration::from_millis(1999));
        assert!(!limiter.allow());

        clock.advance(Duration::from_millis(1));
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn idle_time_does_not_exceed_capacity() {
        let (limiter, clock) = limiter(Duration::from_secs(2), 1);
        assert!(limiter.allow());

        clock.advance(Duration::from_secs(60));
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn burst_capacity_is_honoured() {
        let (limiter, clock) = limiter(Duration::from_secs(1), 3);
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(!limiter.allow());

        clock.advance(Duration::from_millis(500));
        assert!(!limiter.allow());
        clock.advance(Duration::from_millis(500));
        assert!(limiter.allow());
    }

    #[test]
    fn denied_calls_do_not_push_back_the_next_permit() {
        let (limiter, clock) = limiter(Duration::from_secs(2), 1);
        assert!(limiter.allow());

        for _ in 0..3 {
            clock.advance(Duration::from_millis(500));
            assert!(!limiter.allow(), "granted before a full interval elapsed");
        }

        // 2s in total since the last grant, spread over denied calls
        clock.advance(Duration::from_millis(500));
        assert!(limiter.allow());
    }

    #[test]
    fn zero_interval_or_burst_is_rejected() {
        assert!(matches!(
            RateLimiter::new(Duration::ZERO, 1),
            Err(LimiterError::ZeroInterval)
        ));
        assert!(matches!(
            RateLimiter::new(Duration::from_secs(2), 0),
            Err(LimiterError::ZeroBurst)
        ));
    }

    #[test]
    fn concurrent_callers_never_double_grant() {
        let (limiter, _clock) = limiter(Duration::from_secs(3600), 1);
        let limiter = Arc::new(limiter);
        let granted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                let granted = granted.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        if limiter.allow() {
                            granted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(granted.load(Ordering::SeqCst), 1);
    }
}
