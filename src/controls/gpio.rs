use super::input::ControlInput;
use crate::error::{GifcamError, Result};
use rppal::gpio::{Gpio, InputPin};
use tracing::debug;

/// Button wired between a BCM pin and ground, read with the internal pull-up
pub struct GpioButton {
    name: String,
    pin: InputPin,
}

impl GpioButton {
    pub fn new(gpio: &Gpio, name: &str, bcm_pin: u8) -> Result<Self> {
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| GifcamError::Control(format!("{} button on GPIO {}: {}", name, bcm_pin, e)))?
            .into_input_pullup();

        debug!("{} button on GPIO {}", name, bcm_pin);

        Ok(Self {
            name: name.to_string(),
            pin,
        })
    }
}

impl ControlInput for GpioButton {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&mut self) -> bool {
        self.pin.is_low()
    }
}
