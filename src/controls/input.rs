/// A momentary push button, sampled by the main loop
pub trait ControlInput: Send {
    fn name(&self) -> &str;

    /// Current raw level: `true` while the button is held down
    fn is_active(&mut self) -> bool;
}
