pub mod clock;
pub mod flag;
pub mod frame_rate;
pub mod monitor;
pub mod render_time;

pub use clock::{FrameClock, TickerFrameClock};
pub use flag::{LowPerformanceFlag, Trigger};
pub use monitor::{MonitorState, PerformanceMonitor, Update};
