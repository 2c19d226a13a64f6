//! Consumers of the monitor's outputs used by the UI components.

pub mod background;
pub mod loading;

pub use background::BackgroundTier;
pub use loading::{LoadingStyle, LoadingView};
