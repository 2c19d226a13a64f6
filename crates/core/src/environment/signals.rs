use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::types::EffectiveConnectionType;

/// Pending battery-level read, resolving to a charge ratio in `0.0..=1.0`.
pub type BatteryQuery = Pin<Box<dyn Future<Output = Option<f64>> + Send + 'static>>;

/// Ambient runtime signals the monitor reads. Every signal is optional.
pub trait SignalSource: Send + Sync {
    /// Device memory hint in GiB.
    fn device_memory_gb(&self) -> Option<f64>;

    fn logical_cores(&self) -> Option<usize>;

    fn effective_connection_type(&self) -> Option<EffectiveConnectionType>;

    /// Viewport width in CSS pixels.
    fn viewport_width(&self) -> Option<u32>;

    fn prefers_reduced_motion(&self) -> Option<bool>;

    fn user_agent(&self) -> Option<String>;

    /// Starts a battery query. `None` when the runtime has no battery API.
    fn battery_level(&self) -> Option<BatteryQuery>;
}

/// Battery reading delivered after `delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub level: f64,
    pub delay: Duration,
}

/// Fixed signal values, used by tests and as the override layer of
/// [`OverriddenSignals`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSignals {
    pub memory_gb: Option<f64>,
    pub cores: Option<usize>,
    pub connection: Option<EffectiveConnectionType>,
    pub viewport_width: Option<u32>,
    pub reduced_motion: Option<bool>,
    pub user_agent: Option<String>,
    pub battery: Option<BatteryReading>,
}

impl StaticSignals {
    /// No signal available at all.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_memory_gb(mut self, gb: f64) -> Self {
        self.memory_gb = Some(gb);
        self
    }

    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = Some(cores);
        self
    }

    pub fn with_connection(mut self, kind: EffectiveConnectionType) -> Self {
        self.connection = Some(kind);
        self
    }

    pub fn with_viewport_width(mut self, px: u32) -> Self {
        self.viewport_width = Some(px);
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = Some(reduced);
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Battery that resolves immediately.
    pub fn with_battery(self, level: f64) -> Self {
        self.with_deferred_battery(level, Duration::ZERO)
    }

    /// Battery that resolves only after `delay` of runtime time.
    pub fn with_deferred_battery(mut self, level: f64, delay: Duration) -> Self {
        self.battery = Some(BatteryReading { level, delay });
        self
    }
}

impl SignalSource for StaticSignals {
    fn device_memory_gb(&self) -> Option<f64> {
        self.memory_gb
    }

    fn logical_cores(&self) -> Option<usize> {
        self.cores
    }

    fn effective_connection_type(&self) -> Option<EffectiveConnectionType> {
        self.connection
    }

    fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.reduced_motion
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn battery_level(&self) -> Option<BatteryQuery> {
        let reading = self.battery?;
        Some(Box::pin(async move {
            if !reading.delay.is_zero() {
                tokio::time::sleep(reading.delay).await;
            }
            Some(reading.level)
        }))
    }
}

/// Layers explicit values over another source; unset overrides fall through.
#[derive(Debug, Clone)]
pub struct OverriddenSignals<S> {
    base: S,
    overrides: StaticSignals,
}

impl<S: SignalSource> OverriddenSignals<S> {
    pub fn new(base: S, overrides: StaticSignals) -> Self {
        Self { base, overrides }
    }

    pub fn base(&self) -> &S {
        &self.base
    }
}

impl<S: SignalSource> SignalSource for OverriddenSignals<S> {
    fn device_memory_gb(&self) -> Option<f64> {
        self.overrides.memory_gb.or_else(|| self.base.device_memory_gb())
    }

    fn logical_cores(&self) -> Option<usize> {
        self.overrides.cores.or_else(|| self.base.logical_cores())
    }

    fn effective_connection_type(&self) -> Option<EffectiveConnectionType> {
        self.overrides
            .connection
            .or_else(|| self.base.effective_connection_type())
    }

    fn viewport_width(&self) -> Option<u32> {
        self.overrides
            .viewport_width
            .or_else(|| self.base.viewport_width())
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.overrides
            .reduced_motion
            .or_else(|| self.base.prefers_reduced_motion())
    }

    fn user_agent(&self) -> Option<String> {
        self.overrides
            .user_agent
            .clone()
            .or_else(|| self.base.user_agent())
    }

    fn battery_level(&self) -> Option<BatteryQuery> {
        self.overrides
            .battery_level()
            .or_else(|| self.base.battery_level())
    }
}
