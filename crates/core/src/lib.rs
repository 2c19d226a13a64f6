//! Performance-adaptive UI controller for the School2Career front-end.
//!
//! A [`PerformanceMonitor`] samples device signals through a
//! [`SignalSource`], classifies the device, measures render latency and
//! sustained frame rate on a [`FrameClock`], and exposes a sticky low
//! performance flag, derived [`OptimizationSettings`] and localized warnings.

pub mod config;
pub mod environment;
pub mod i18n;
pub mod optimization;
pub mod presentation;
pub mod report;
pub mod runtime;
pub mod types;

pub use config::MonitorCfg;
pub use environment::{PerformanceSnapshot, SignalSource};
pub use i18n::Locale;
pub use optimization::{OptimizationSettings, Warning};
pub use report::PerformanceReport;
pub use runtime::{FrameClock, PerformanceMonitor};
