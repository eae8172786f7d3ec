use super::input::ControlInput;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Button for tests. Clones share the same level, so a test keeps one handle
/// and hands the other to the code under test.
#[derive(Clone)]
pub struct MockControl {
    name: String,
    held: Arc<AtomicBool>,
}

impl MockControl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn press(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl ControlInput for MockControl {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&mut self) -> bool {
        self.is_held()
    }
}
