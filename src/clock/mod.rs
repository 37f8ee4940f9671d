//! Clock / timer service
//!
//! Test bodies use [`Clock::after`] to simulate asynchronous work. Waiting is a
//! cooperative suspension point on the tokio timer, so a suspended body never
//! blocks sibling test cases running on the same runtime.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Timer service shared by every unit of work in a suite run
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Suspension point that resumes once `duration` has elapsed
    pub fn after(&self, duration: Duration) -> impl Future<Output = ()> + Send + 'static {
        tokio::time::sleep(duration)
    }

    /// Same as [`Clock::after`] with a millisecond count
    pub fn after_ms(&self, millis: u64) -> impl Future<Output = ()> + Send + 'static {
        self.after(Duration::from_millis(millis))
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Milliseconds from the origin to `instant`
    pub fn offset_ms(&self, instant: Instant) -> u64 {
        instant.saturating_duration_since(self.origin).as_millis() as u64
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_after_resumes_once_elapsed() {
        let clock = Clock::new();
        clock.after_ms(3000).await;
        assert_eq!(clock.elapsed().as_millis(), 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_do_not_block_each_other() {
        let clock = Clock::new();
        let a = tokio::spawn(clock.after_ms(3000));
        let b = tokio::spawn(clock.after_ms(3000));
        tokio_test::assert_ok!(a.await);
        tokio_test::assert_ok!(b.await);

        // Both waits overlapped, so only one interval passed.
        assert_eq!(clock.elapsed().as_millis(), 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offset_ms() {
        let clock = Clock::new();
        clock.after_ms(250).await;
        assert_eq!(clock.offset_ms(Instant::now()), 250);
        assert_eq!(clock.offset_ms(clock.origin()), 0);
    }
}
