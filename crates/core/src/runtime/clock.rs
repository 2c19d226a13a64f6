use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::Instant;

/// Pending next-paint callback, resolving to the frame timestamp.
/// `None` means the clock stopped producing frames.
pub type FrameFuture<'a> = Pin<Box<dyn Future<Output = Option<Instant>> + Send + 'a>>;

/// The hosting runtime's animation-frame facility.
pub trait FrameClock: Send + Sync {
    fn now(&self) -> Instant;

    /// Resolves at the next paint after the call.
    fn next_frame(&self) -> FrameFuture<'_>;
}

/// Fixed-rate frame clock on tokio time. Frames land on a grid anchored at
/// the clock's creation, so every waiter sees the same timestamps.
#[derive(Debug, Clone)]
pub struct TickerFrameClock {
    origin: Instant,
    period: Duration,
}

impl TickerFrameClock {
    pub fn new(period: Duration) -> Self {
        Self {
            origin: Instant::now(),
            period: period.max(Duration::from_micros(1)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// First grid point strictly after `now`.
    fn next_deadline(&self, now: Instant) -> Instant {
        let elapsed = now.saturating_duration_since(self.origin).as_nanos();
        let period = self.period.as_nanos();
        let ticks = elapsed / period + 1;
        let offset = u64::try_from(ticks * period).unwrap_or(u64::MAX);
        self.origin + Duration::from_nanos(offset)
    }
}

impl FrameClock for TickerFrameClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn next_frame(&self) -> FrameFuture<'_> {
        let deadline = self.next_deadline(Instant::now());
        Box::pin(async move {
            tokio::time::sleep_until(deadline).await;
            Some(deadline)
        })
    }
}
