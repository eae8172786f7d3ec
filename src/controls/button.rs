use super::input::ControlInput;
use crate::config::TriggerMode;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Turns raw button samples into activations.
///
/// In [`TriggerMode::Edge`] a press fires once, on the released -> held
/// transition. In [`TriggerMode::Level`] every sample taken while held fires.
/// Either way no two activations are reported closer than the debounce window.
pub struct ButtonMonitor {
    input: Box<dyn ControlInput>,
    mode: TriggerMode,
    debounce: Duration,
    was_active: bool,
    last_fired: Option<Instant>,
    activations: u64,
}

impl ButtonMonitor {
    pub fn new(input: Box<dyn ControlInput>, mode: TriggerMode, debounce: Duration) -> Self {
        Self {
            input,
            mode,
            debounce,
            was_active: false,
            last_fired: None,
            activations: 0,
        }
    }

    /// Sample the button once. Returns `true` if this sample is an activation.
    pub fn poll(&mut self, now: Instant) -> bool {
        let active = self.input.is_active();
        let rising = active && !self.was_active;
        self.was_active = active;

        let triggered = match self.mode {
            TriggerMode::Edge => rising,
            TriggerMode::Level => active,
        };
        if !triggered {
            return false;
        }

        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) < self.debounce {
                return false;
            }
        }

        self.last_fired = Some(now);
        self.activations += 1;
        debug!("{} button activated ({:?})", self.input.name(), self.mode);
        true
    }

    pub fn name(&self) -> &str {
        self.input.name()
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }
}
