use std::time::Duration;

/// What a single indicator should be doing
#[derive(Debug, Clone, PartialEq)]
pub enum LedPattern {
    Off,
    /// Constant output at the given intensity (0.0..=1.0)
    Steady(f64),
    /// Visible on/off cycling at the indicator's pulse rate. The value is
    /// the pulse strength (0.0..=1.0); a full pulse still blinks.
    Pulse(f64),
    /// Timed blinks played once, in order
    BlinkSequence(Vec<BlinkStep>),
}

/// `count` blinks, each `on_ms` on followed by `on_ms` off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkStep {
    pub count: u32,
    pub on_ms: u64,
}

impl BlinkStep {
    pub fn new(count: u32, on_ms: u64) -> Self {
        Self { count, on_ms }
    }
}

impl LedPattern {
    /// Three short, three long, three short
    pub fn alert(short_ms: u64, long_ms: u64) -> Self {
        LedPattern::BlinkSequence(vec![
            BlinkStep::new(3, short_ms),
            BlinkStep::new(3, long_ms),
            BlinkStep::new(3, short_ms),
        ])
    }

    /// Whether the pattern has to be played out over time
    pub fn is_timed(&self) -> bool {
        matches!(self, LedPattern::BlinkSequence(_))
    }

    /// Wall time a timed pattern occupies; zero for static patterns
    pub fn duration(&self) -> Duration {
        match self {
            LedPattern::BlinkSequence(steps) => steps
                .iter()
                .map(|step| Duration::from_millis(step.on_ms * 2 * step.count as u64))
                .sum(),
            _ => Duration::ZERO,
        }
    }
}

/// Transient activity the indicators reflect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackState {
    Ready,
    Capturing,
    Assembling,
    Uploading,
}

/// Targets driven by the activity state; connectivity is tracked separately
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPatterns {
    pub busy: LedPattern,
    pub ready: LedPattern,
    pub upload: LedPattern,
}

/// Ready indicator level at rest
pub const READY_REST_LEVEL: f64 = 0.5;

/// Map an activity state to the busy, ready and upload indicators.
/// The ready indicator mirrors busy: off during work, mid at rest.
pub fn patterns_for(state: FeedbackState) -> IndicatorPatterns {
    match state {
        FeedbackState::Ready => IndicatorPatterns {
            busy: LedPattern::Steady(1.0),
            ready: LedPattern::Steady(READY_REST_LEVEL),
            upload: LedPattern::Off,
        },
        FeedbackState::Capturing => IndicatorPatterns {
            busy: LedPattern::Pulse(0.5),
            ready: LedPattern::Off,
            upload: LedPattern::Off,
        },
        FeedbackState::Assembling => IndicatorPatterns {
            busy: LedPattern::Pulse(1.0),
            ready: LedPattern::Off,
            upload: LedPattern::Off,
        },
        FeedbackState::Uploading => IndicatorPatterns {
            busy: LedPattern::Steady(1.0),
            ready: LedPattern::Pulse(0.25),
            upload: LedPattern::Pulse(0.75),
        },
    }
}
