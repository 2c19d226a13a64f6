pub mod settings;
pub mod warnings;

pub use settings::{AnimationIntensity, OptimizationSettings};
pub use warnings::Warning;
