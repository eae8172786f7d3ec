mod button;
#[cfg(all(target_os = "linux", feature = "gpio"))]
mod gpio;
mod input;
pub mod mock;
#[cfg(test)]
mod tests;

pub use button::ButtonMonitor;
#[cfg(all(target_os = "linux", feature = "gpio"))]
pub use gpio::GpioButton;
pub use input::ControlInput;
