use serde::{Deserialize, Serialize};

/// What raised low performance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    LowBattery,
    SlowRender,
    LowFrameRate,
    ReducedMotion,
    Manual,
}

/// Sticky low performance flag.
///
/// Raise: any trigger, idempotent, first trigger is remembered.
/// Clear: only an explicit [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowPerformanceFlag {
    raised_by: Option<Trigger>,
}

impl LowPerformanceFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call raised a previously clear flag.
    pub fn raise(&mut self, trigger: Trigger) -> bool {
        if self.raised_by.is_some() {
            return false;
        }
        self.raised_by = Some(trigger);
        true
    }

    /// Returns true if the flag was raised before the reset.
    pub fn reset(&mut self) -> bool {
        self.raised_by.take().is_some()
    }

    pub fn is_raised(&self) -> bool {
        self.raised_by.is_some()
    }

    pub fn raised_by(&self) -> Option<Trigger> {
        self.raised_by
    }
}
