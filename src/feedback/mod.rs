mod controller;
#[cfg(all(target_os = "linux", feature = "gpio"))]
mod gpio;
mod indicator;
pub mod mock;
mod pattern;

pub use controller::{FeedbackController, Indicators};
#[cfg(all(target_os = "linux", feature = "gpio"))]
pub use gpio::GpioIndicator;
pub use indicator::{Indicator, IndicatorTarget};
pub use pattern::{
    patterns_for, BlinkStep, FeedbackState, IndicatorPatterns, LedPattern, READY_REST_LEVEL,
};
