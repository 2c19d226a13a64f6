//! Animated background tier.
//!
//! The background component scores the device independently of the monitor
//! and budgets its particles and floating shapes by tier.

use serde::{Deserialize, Serialize};

use crate::config::MonitorCfg;
use crate::environment::signals::SignalSource;

const MOBILE_UA_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];
const TABLET_UA_TOKENS: [&str; 2] = ["ipad", "android"];
const TABLET_MIN_WIDTH_PX: u32 = 768;

/// Assumed when the runtime does not report cores or memory.
const DEFAULT_CORES: usize = 4;
const DEFAULT_MEMORY_GB: f64 = 4.0;

const PENALTY_PHONE: u32 = 30;
const PENALTY_FEW_CORES: u32 = 25;
const PENALTY_LOW_MEMORY: u32 = 20;
const PENALTY_NARROW: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTier {
    Minimal,
    Low,
    Normal,
    High,
}

impl BackgroundTier {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Self::High
        } else if score >= 50 {
            Self::Normal
        } else if score >= 20 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Particles to draw for a requested count.
    pub fn particle_budget(self, requested: u32) -> u32 {
        match self {
            Self::Minimal => 0,
            Self::Low => requested.min(10),
            Self::Normal => requested.min(25),
            Self::High => requested.min(50),
        }
    }

    pub fn shows_shapes(self) -> bool {
        self != Self::Minimal
    }
}

fn ua_contains_any(ua: &str, tokens: &[&str]) -> bool {
    let ua = ua.to_ascii_lowercase();
    tokens.iter().any(|t| ua.contains(t))
}

/// Device score in `0..=100`. A reduced-motion preference scores zero.
pub fn score(signals: &dyn SignalSource, cfg: &MonitorCfg) -> u32 {
    if signals.prefers_reduced_motion().unwrap_or(false) {
        return 0;
    }

    let width = signals.viewport_width();
    let ua = signals.user_agent().unwrap_or_default();
    let is_mobile = ua_contains_any(&ua, &MOBILE_UA_TOKENS);
    let is_tablet = ua_contains_any(&ua, &TABLET_UA_TOKENS)
        && width.is_some_and(|w| w >= TABLET_MIN_WIDTH_PX);
    let cores = signals
        .logical_cores()
        .filter(|c| *c > 0)
        .unwrap_or(DEFAULT_CORES);
    let memory = signals
        .device_memory_gb()
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(DEFAULT_MEMORY_GB);

    let mut score: u32 = 100;
    if is_mobile && !is_tablet {
        score = score.saturating_sub(PENALTY_PHONE);
    }
    if cores <= cfg.cores_low {
        score = score.saturating_sub(PENALTY_FEW_CORES);
    }
    if memory <= cfg.memory_low_gb {
        score = score.saturating_sub(PENALTY_LOW_MEMORY);
    }
    if width.is_some_and(|w| w <= cfg.mobile_viewport_px) {
        score = score.saturating_sub(PENALTY_NARROW);
    }
    score
}

pub fn assess(signals: &dyn SignalSource, cfg: &MonitorCfg) -> BackgroundTier {
    BackgroundTier::from_score(score(signals, cfg))
}
