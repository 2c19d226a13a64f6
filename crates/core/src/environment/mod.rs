pub mod detector;
pub mod host;
pub mod signals;
pub mod snapshot;

pub use detector::{Detection, detect};
pub use host::HostSignals;
pub use signals::{BatteryQuery, OverriddenSignals, SignalSource, StaticSignals};
pub use snapshot::{BatteryLevel, ConnectionSpeed, DeviceClass, Hint, MemoryStatus, PerformanceSnapshot};
