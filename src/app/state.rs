use tokio::time::Instant;
use tracing::{debug, warn};

/// What the main loop is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Capturing,
    Uploading,
}

/// Loop-owned view of the appliance
#[derive(Debug, Clone)]
pub struct SystemState {
    mode: Mode,
    wifi_connected: bool,
    last_wifi_check: Option<Instant>,
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            wifi_connected: false,
            last_wifi_check: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Enter a working mode. Only one of capture and upload runs at a time,
    /// so this refuses unless the loop is idle.
    pub fn begin(&mut self, mode: Mode) -> bool {
        if self.mode != Mode::Idle {
            warn!("Cannot enter {:?} while {:?}", mode, self.mode);
            return false;
        }
        debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        true
    }

    pub fn finish(&mut self) {
        debug!("Mode {:?} -> Idle", self.mode);
        self.mode = Mode::Idle;
    }

    pub fn record_probe(&mut self, connected: bool, at: Instant) {
        self.wifi_connected = connected;
        self.last_wifi_check = Some(at);
    }

    pub fn wifi_connected(&self) -> bool {
        self.wifi_connected
    }

    pub fn last_wifi_check(&self) -> Option<Instant> {
        self.last_wifi_check
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}
