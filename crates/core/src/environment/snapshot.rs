use serde::{Deserialize, Serialize};

use crate::i18n::{self, Locale};

/// Coarse device capability class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionSpeed {
    #[default]
    Unknown,
    Slow,
    Medium,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryStatus {
    #[default]
    Unknown,
    Limited,
    Moderate,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryLevel {
    #[default]
    Unknown,
    Low,
    Good,
}

/// Diagnostic hint appended by the detector, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    ReduceAnimations,
    ModerateOptimization,
    ReduceProcessing,
    ReduceData,
    SaveBattery,
    OptimizeMobile,
}

impl Hint {
    pub fn message(self, locale: Locale) -> &'static str {
        i18n::hint(locale, self)
    }
}

/// Point-in-time read of device/runtime capability signals.
///
/// `Default` is the pre-detection state; [`PerformanceSnapshot::baseline`] is
/// what detection starts from before any signal is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub device_class: DeviceClass,
    pub connection_speed: ConnectionSpeed,
    pub memory_status: MemoryStatus,
    pub battery_level: BatteryLevel,
    /// Last measured frame-render latency.
    pub render_time_ms: f64,
    pub recommendations: Vec<Hint>,
}

impl PerformanceSnapshot {
    /// Favorable defaults: absence of a signal never counts against the device.
    pub fn baseline() -> Self {
        Self {
            device_class: DeviceClass::High,
            connection_speed: ConnectionSpeed::Fast,
            memory_status: MemoryStatus::Good,
            battery_level: BatteryLevel::Good,
            render_time_ms: 0.0,
            recommendations: Vec::new(),
        }
    }

    pub fn has_hint(&self, hint: Hint) -> bool {
        self.recommendations.contains(&hint)
    }

    pub fn recommendation_messages(&self, locale: Locale) -> Vec<&'static str> {
        self.recommendations.iter().map(|h| h.message(locale)).collect()
    }
}
