use std::time::Duration;

use tokio::time::Instant;

use crate::types::FrameRateTrigger;

/// One completed sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    /// Frames counted in the window; published as the current frame rate.
    pub frames: u32,
    /// Whether the low-frame-rate trigger fired for this window.
    pub low: bool,
}

/// Per-frame counter that closes a window once `window` has elapsed since the
/// previous boundary.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    frames: u32,
    window_start: Instant,
    window: Duration,
    threshold: u32,
    trigger: FrameRateTrigger,
}

impl FrameRateCounter {
    pub fn new(start: Instant, window: Duration, threshold: u32, trigger: FrameRateTrigger) -> Self {
        Self {
            frames: 0,
            window_start: start,
            window,
            threshold,
            trigger,
        }
    }

    /// Count one frame painted at `now`. Returns the window it closed, if any.
    pub fn on_frame(&mut self, now: Instant) -> Option<FrameWindow> {
        self.frames = self.frames.saturating_add(1);
        if now.saturating_duration_since(self.window_start) < self.window {
            return None;
        }

        let published = self.frames;
        self.frames = 0;
        self.window_start = now;

        let compared = match self.trigger {
            FrameRateTrigger::Published => published,
            // counter was already zeroed above
            FrameRateTrigger::PostReset => self.frames,
        };
        Some(FrameWindow {
            frames: published,
            low: compared < self.threshold,
        })
    }
}
