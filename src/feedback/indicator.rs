use super::pattern::LedPattern;
use crate::error::FeedbackError;

/// The four physical LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorTarget {
    Busy,
    Ready,
    Connectivity,
    Upload,
}

impl IndicatorTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorTarget::Busy => "busy",
            IndicatorTarget::Ready => "ready",
            IndicatorTarget::Connectivity => "connectivity",
            IndicatorTarget::Upload => "upload",
        }
    }
}

/// One LED output. Implementations only hold static patterns; timed
/// sequences are played by the controller as a series of static ones.
pub trait Indicator: Send {
    fn name(&self) -> &str;

    fn show(&mut self, pattern: &LedPattern) -> Result<(), FeedbackError>;

    /// Switch off and give the output back
    fn release(&mut self) -> Result<(), FeedbackError>;
}
