use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::i18n::Locale;
use crate::types::FrameRateTrigger;

/// Prefix of the environment variables read by [`MonitorCfg::from_env`].
pub const ENV_PREFIX: &str = "S2C_PERF_";

/// All performance monitor parameters.
/// Missing or unparsable keys fall back to the default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorCfg {
    // capability detection
    pub memory_low_gb: f64,
    pub memory_medium_gb: f64,
    pub cores_low: usize,
    pub battery_low_ratio: f64,
    pub mobile_viewport_px: u32,

    // render / frame sampling
    pub frame_budget_ms: f64,
    pub frame_rate_low: u32,
    pub frame_window_ms: u64,
    pub initial_frame_rate: u32,
    pub frame_rate_trigger: FrameRateTrigger,
    pub refresh_hz: u32,

    // messages
    pub locale: Locale,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self {
            memory_low_gb: 2.0,
            memory_medium_gb: 4.0,
            cores_low: 2,
            battery_low_ratio: 0.20,
            mobile_viewport_px: 480,
            frame_budget_ms: 16.67,
            frame_rate_low: 30,
            frame_window_ms: 1000,
            initial_frame_rate: 60,
            frame_rate_trigger: FrameRateTrigger::Published,
            refresh_hz: 60,
            locale: Locale::Ar,
        }
    }
}

impl MonitorCfg {
    /// Load config from `S2C_PERF_<KEY>` environment variables.
    pub fn from_env() -> Self {
        let map: HashMap<String, String> = std::env::vars()
            .filter_map(|(k, v)| {
                k.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_ascii_lowercase(), v))
            })
            .collect();
        Self::from_map(&map)
    }

    pub fn from_map(m: &HashMap<String, String>) -> Self {
        let d = Self::default();
        Self {
            memory_low_gb: get_or(m, "memory_low_gb", d.memory_low_gb),
            memory_medium_gb: get_or(m, "memory_medium_gb", d.memory_medium_gb),
            cores_low: get_or(m, "cores_low", d.cores_low),
            battery_low_ratio: get_or(m, "battery_low_ratio", d.battery_low_ratio),
            mobile_viewport_px: get_or(m, "mobile_viewport_px", d.mobile_viewport_px),
            frame_budget_ms: get_or(m, "frame_budget_ms", d.frame_budget_ms),
            frame_rate_low: get_or(m, "frame_rate_low", d.frame_rate_low),
            frame_window_ms: get_or(m, "frame_window_ms", d.frame_window_ms),
            initial_frame_rate: get_or(m, "initial_frame_rate", d.initial_frame_rate),
            frame_rate_trigger: get_or(m, "frame_rate_trigger", d.frame_rate_trigger),
            refresh_hz: get_or(m, "refresh_hz", d.refresh_hz),
            locale: get_or(m, "locale", d.locale),
        }
    }

    /// `(key, value, description)` for every parameter.
    pub fn to_entries(&self) -> Vec<(&'static str, String, &'static str)> {
        vec![
            ("memory_low_gb", self.memory_low_gb.to_string(), "Memory hint at or below which the device is low class"),
            ("memory_medium_gb", self.memory_medium_gb.to_string(), "Memory hint at or below which the device is medium class"),
            ("cores_low", self.cores_low.to_string(), "Logical core count at or below which the device is low class"),
            ("battery_low_ratio", self.battery_low_ratio.to_string(), "Battery ratio below which power saving starts"),
            ("mobile_viewport_px", self.mobile_viewport_px.to_string(), "Viewport width at or below which mobile hint is added"),
            ("frame_budget_ms", self.frame_budget_ms.to_string(), "Render latency above which a frame is slow"),
            ("frame_rate_low", self.frame_rate_low.to_string(), "Frames per window below which frame rate is low"),
            ("frame_window_ms", self.frame_window_ms.to_string(), "Frame rate sampling window ms"),
            ("initial_frame_rate", self.initial_frame_rate.to_string(), "Frame rate reported before the first window"),
            ("frame_rate_trigger", self.frame_rate_trigger.to_string(), "Counter compared by the low frame rate trigger"),
            ("refresh_hz", self.refresh_hz.to_string(), "Ticker clock refresh rate"),
            ("locale", self.locale.to_string(), "Default message locale"),
        ]
    }

    pub fn frame_window(&self) -> Duration {
        Duration::from_millis(self.frame_window_ms)
    }

    /// Frame period of the ticker clock. A zero refresh rate falls back to 60 Hz.
    pub fn frame_period(&self) -> Duration {
        let hz = if self.refresh_hz == 0 { 60 } else { self.refresh_hz };
        Duration::from_secs_f64(1.0 / f64::from(hz))
    }
}

fn get_or<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str, default: T) -> T {
    map.get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
