use super::indicator::{Indicator, IndicatorTarget};
use super::pattern::{patterns_for, FeedbackState, LedPattern};
use crate::config::FeedbackConfig;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// The four indicator outputs, one per target
pub struct Indicators {
    pub busy: Box<dyn Indicator>,
    pub ready: Box<dyn Indicator>,
    pub connectivity: Box<dyn Indicator>,
    pub upload: Box<dyn Indicator>,
}

/// Owns every indicator and keeps them in line with the activity state.
///
/// Indicator failures never propagate: a dead LED is logged and the
/// appliance keeps working.
pub struct FeedbackController {
    indicators: Indicators,
    state: FeedbackState,
    current: HashMap<IndicatorTarget, LedPattern>,
    alert: LedPattern,
    capture_ack: Duration,
    alerts_rendered: u32,
}

impl FeedbackController {
    pub fn new(indicators: Indicators, config: &FeedbackConfig) -> Self {
        Self {
            indicators,
            state: FeedbackState::Ready,
            current: HashMap::new(),
            alert: LedPattern::alert(config.short_blink_ms, config.long_blink_ms),
            capture_ack: Duration::from_millis(config.capture_ack_ms),
            alerts_rendered: 0,
        }
    }

    /// Move to `state`, touching only indicators whose pattern changes
    pub fn enter(&mut self, state: FeedbackState) {
        if state != self.state {
            debug!("Feedback state {:?} -> {:?}", self.state, state);
        }
        self.state = state;

        let patterns = patterns_for(state);
        self.set(IndicatorTarget::Busy, patterns.busy);
        self.set(IndicatorTarget::Ready, patterns.ready);
        self.set(IndicatorTarget::Upload, patterns.upload);
    }

    /// Connectivity LED: on iff the last probe succeeded
    pub fn show_connectivity(&mut self, connected: bool) {
        let pattern = if connected {
            LedPattern::Steady(1.0)
        } else {
            LedPattern::Off
        };
        self.set(IndicatorTarget::Connectivity, pattern);
    }

    /// Play the blocked-upload alert on the ready indicator, then restore
    /// the ready pattern. Holds the caller for the whole sequence.
    pub async fn render_alert(&mut self) {
        let alert = self.alert.clone();
        debug!("Playing upload-blocked alert ({:?})", alert.duration());
        self.play(IndicatorTarget::Ready, &alert).await;
        self.alerts_rendered += 1;

        self.current.remove(&IndicatorTarget::Ready);
        self.enter(FeedbackState::Ready);
    }

    /// Raise the ready indicator briefly after a completed capture, then
    /// settle back into [`FeedbackState::Ready`]
    pub async fn acknowledge_capture(&mut self) {
        self.enter(FeedbackState::Ready);
        self.set(IndicatorTarget::Ready, LedPattern::Steady(1.0));
        sleep(self.capture_ack).await;

        self.set(IndicatorTarget::Ready, patterns_for(FeedbackState::Ready).ready);
    }

    /// Play a timed pattern on one target as a series of on/off steps
    pub async fn play(&mut self, target: IndicatorTarget, pattern: &LedPattern) {
        let LedPattern::BlinkSequence(steps) = pattern else {
            self.set(target, pattern.clone());
            return;
        };

        for step in steps {
            let half_period = Duration::from_millis(step.on_ms);
            for _ in 0..step.count {
                self.drive(target, &LedPattern::Steady(1.0));
                sleep(half_period).await;
                self.drive(target, &LedPattern::Off);
                sleep(half_period).await;
            }
        }
        self.current.insert(target, LedPattern::Off);
    }

    /// Switch everything off and release the outputs
    pub fn release_all(&mut self) {
        for target in [
            IndicatorTarget::Busy,
            IndicatorTarget::Ready,
            IndicatorTarget::Connectivity,
            IndicatorTarget::Upload,
        ] {
            let indicator = self.indicator_mut(target);
            if let Err(e) = indicator.release() {
                warn!("Failed to release {} indicator: {}", target.as_str(), e);
            }
        }
        self.current.clear();
    }

    pub fn state(&self) -> FeedbackState {
        self.state
    }

    /// Pattern last applied to `target`
    pub fn current(&self, target: IndicatorTarget) -> Option<&LedPattern> {
        self.current.get(&target)
    }

    pub fn alerts_rendered(&self) -> u32 {
        self.alerts_rendered
    }

    fn set(&mut self, target: IndicatorTarget, pattern: LedPattern) {
        if self.current.get(&target) == Some(&pattern) {
            return;
        }
        self.drive(target, &pattern);
        self.current.insert(target, pattern);
    }

    fn drive(&mut self, target: IndicatorTarget, pattern: &LedPattern) {
        let indicator = self.indicator_mut(target);
        if let Err(e) = indicator.show(pattern) {
            warn!(
                "Failed to show {:?} on {} indicator: {}",
                pattern,
                target.as_str(),
                e
            );
        }
    }

    fn indicator_mut(&mut self, target: IndicatorTarget) -> &mut Box<dyn Indicator> {
        match target {
            IndicatorTarget::Busy => &mut self.indicators.busy,
            IndicatorTarget::Ready => &mut self.indicators.ready,
            IndicatorTarget::Connectivity => &mut self.indicators.connectivity,
            IndicatorTarget::Upload => &mut self.indicators.upload,
        }
    }
}
