use super::indicator::Indicator;
use super::pattern::LedPattern;
use crate::error::FeedbackError;
use rppal::gpio::{Gpio, OutputPin};
use tracing::debug;

/// Duty cycle of a full-strength pulse; anything higher reads as steady
const MAX_PULSE_DUTY: f64 = 0.8;

/// LED on a BCM pin, driven with rppal's software PWM
pub struct GpioIndicator {
    name: String,
    pin: OutputPin,
    pulse_hz: f64,
    dim_hz: f64,
}

impl GpioIndicator {
    pub fn new(
        gpio: &Gpio,
        name: &str,
        bcm_pin: u8,
        pulse_hz: f64,
        dim_hz: f64,
    ) -> Result<Self, FeedbackError> {
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| FeedbackError::Unavailable {
                indicator: name.to_string(),
                details: format!("GPIO {}: {}", bcm_pin, e),
            })?
            .into_output_low();

        debug!("Indicator {} on GPIO {}", name, bcm_pin);

        Ok(Self {
            name: name.to_string(),
            pin,
            pulse_hz,
            dim_hz,
        })
    }

    fn output_error(&self, e: rppal::gpio::Error) -> FeedbackError {
        FeedbackError::Output {
            indicator: self.name.clone(),
            details: e.to_string(),
        }
    }

    fn switch(&mut self, on: bool) -> Result<(), FeedbackError> {
        self.pin.clear_pwm().map_err(|e| self.output_error(e))?;
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }

    fn pwm(&mut self, frequency: f64, duty: f64) -> Result<(), FeedbackError> {
        self.pin
            .set_pwm_frequency(frequency, duty.clamp(0.0, 1.0))
            .map_err(|e| self.output_error(e))
    }
}

impl Indicator for GpioIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn show(&mut self, pattern: &LedPattern) -> Result<(), FeedbackError> {
        match pattern {
            LedPattern::Off => self.switch(false),
            LedPattern::Steady(intensity) if *intensity >= 1.0 => self.switch(true),
            LedPattern::Steady(intensity) if *intensity <= 0.0 => self.switch(false),
            LedPattern::Steady(intensity) => self.pwm(self.dim_hz, *intensity),
            LedPattern::Pulse(strength) => self.pwm(self.pulse_hz, pulse_duty(*strength)),
            LedPattern::BlinkSequence(_) => Err(FeedbackError::NotStatic {
                indicator: self.name.clone(),
            }),
        }
    }

    fn release(&mut self) -> Result<(), FeedbackError> {
        self.switch(false)
    }
}

/// On-fraction of each pulse cycle for a pulse strength in 0.0..=1.0
pub(crate) fn pulse_duty(strength: f64) -> f64 {
    strength.clamp(0.0, 1.0) * MAX_PULSE_DUTY
}
