use std::time::Duration;

use crate::runtime::clock::FrameClock;

/// Latency between a measurement start and the next paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSample {
    pub elapsed: Duration,
}

impl RenderSample {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Slower than the per-frame budget.
    pub fn is_slow(&self, budget_ms: f64) -> bool {
        self.millis() > budget_ms
    }
}

/// Measure one frame. `None` if the clock stopped before painting.
pub async fn measure(clock: &dyn FrameClock) -> Option<RenderSample> {
    let start = clock.now();
    let painted = clock.next_frame().await?;
    Some(RenderSample {
        elapsed: painted.saturating_duration_since(start),
    })
}
