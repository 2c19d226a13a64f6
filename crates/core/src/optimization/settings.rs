use serde::{Deserialize, Serialize};

use crate::environment::snapshot::{BatteryLevel, DeviceClass, PerformanceSnapshot};

/// Particle budget for a capable device.
pub const PARTICLES_FULL: u32 = 50;
/// Particle budget for a medium-class device.
pub const PARTICLES_MEDIUM: u32 = 25;
/// Particle budget for a low-class device or in low performance mode.
pub const PARTICLES_LOW: u32 = 10;
/// Upper bound while the battery is low.
pub const PARTICLES_LOW_BATTERY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationIntensity {
    Minimal,
    Low,
    Medium,
    High,
}

/// UI effect toggles and budgets consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationSettings {
    pub particle_count: u32,
    pub animation_intensity: AnimationIntensity,
    pub enable_shapes: bool,
    pub enable_gradients: bool,
    pub enable_blur: bool,
    pub enable_shadows: bool,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            particle_count: PARTICLES_FULL,
            animation_intensity: AnimationIntensity::High,
            enable_shapes: true,
            enable_gradients: true,
            enable_blur: true,
            enable_shadows: true,
        }
    }
}

impl OptimizationSettings {
    /// Derive settings from a snapshot and the low performance flag.
    pub fn derive(snapshot: &PerformanceSnapshot, low_performance_mode: bool) -> Self {
        let mut s = Self::default();

        if snapshot.device_class == DeviceClass::Low || low_performance_mode {
            s.particle_count = PARTICLES_LOW;
            s.animation_intensity = AnimationIntensity::Low;
            s.enable_shapes = false;
            s.enable_blur = false;
            s.enable_shadows = false;
        } else if snapshot.device_class == DeviceClass::Medium {
            s.particle_count = PARTICLES_MEDIUM;
            s.animation_intensity = AnimationIntensity::Medium;
        }

        // Battery only ever tightens what the class/mode rules produced.
        if snapshot.battery_level == BatteryLevel::Low {
            s.particle_count = s.particle_count.min(PARTICLES_LOW_BATTERY);
            s.animation_intensity = AnimationIntensity::Minimal;
            s.enable_shapes = false;
        }

        s
    }
}
