use serde::{Deserialize, Serialize};

use crate::environment::snapshot::{BatteryLevel, MemoryStatus, PerformanceSnapshot};
use crate::i18n::{self, Locale};

/// Performance warning surfaced to the user, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    LowFrameRate,
    LimitedMemory,
    LowBattery,
}

impl Warning {
    pub fn message(self, locale: Locale) -> &'static str {
        i18n::warning(locale, self)
    }
}

/// Warnings for the current frame rate and snapshot.
/// Order: frame rate, memory, battery. Empty when nothing is wrong.
pub fn report(frame_rate: u32, frame_rate_low: u32, snapshot: &PerformanceSnapshot) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if frame_rate < frame_rate_low {
        warnings.push(Warning::LowFrameRate);
    }
    if snapshot.memory_status == MemoryStatus::Limited {
        warnings.push(Warning::LimitedMemory);
    }
    if snapshot.battery_level == BatteryLevel::Low {
        warnings.push(Warning::LowBattery);
    }
    warnings
}
