use crate::config::NetworkConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info};

/// Reachability check against the outside world
#[async_trait]
pub trait ConnectivityProbe: Send {
    /// Returns `true` when the target accepted a connection. Never errors.
    async fn probe(&mut self) -> bool;
}

/// TCP connect probe with a bounded timeout
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.probe_address.clone(),
            Duration::from_millis(config.probe_timeout_ms),
        )
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn probe(&mut self) -> bool {
        info!("Testing for internet connection via {}", self.address);

        match timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_stream)) => {
                info!("Successfully connected to the internet");
                true
            }
            Ok(Err(e)) => {
                error!("Failed to connect to the internet: {}", e);
                false
            }
            Err(_) => {
                error!(
                    "Failed to connect to the internet: no answer within {:?}",
                    self.timeout
                );
                false
            }
        }
    }
}

/// Caches the last probe result and rate-limits probing
pub struct ConnectivityMonitor {
    probe: Box<dyn ConnectivityProbe>,
    interval: Duration,
    connected: bool,
    last_check: Option<Instant>,
}

impl ConnectivityMonitor {
    pub fn new(probe: Box<dyn ConnectivityProbe>, interval: Duration) -> Self {
        Self {
            probe,
            interval,
            connected: false,
            last_check: None,
        }
    }

    /// Whether a probe is owed at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_check {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Probe if the interval has elapsed. Returns the fresh result when a
    /// probe ran, `None` when the cached value was reused.
    pub async fn refresh_if_due(&mut self, now: Instant) -> Option<bool> {
        if !self.is_due(now) {
            return None;
        }

        self.connected = self.probe.probe().await;
        self.last_check = Some(now);
        debug!("Connectivity cached as {}", self.connected);
        Some(self.connected)
    }

    /// Last known result; `false` until the first probe completes
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_check(&self) -> Option<Instant> {
        self.last_check
    }
}

pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Scripted probe; repeats the last scripted answer once the script runs out
    #[derive(Clone)]
    pub struct MockProbe {
        answers: Arc<Mutex<VecDeque<bool>>>,
        fallback: Arc<Mutex<bool>>,
        calls: Arc<Mutex<u32>>,
    }

    impl MockProbe {
        pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: Arc::new(Mutex::new(answers.into_iter().collect())),
                fallback: Arc::new(Mutex::new(false)),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        pub fn always(connected: bool) -> Self {
            let probe = Self::new([]);
            *probe.fallback.lock() = connected;
            probe
        }

        pub fn calls(&self) -> u32 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl ConnectivityProbe for MockProbe {
        async fn probe(&mut self) -> bool {
            *self.calls.lock() += 1;
            let next = self.answers.lock().pop_front();
            match next {
                Some(answer) => {
                    *self.fallback.lock() = answer;
                    answer
                }
                None => *self.fallback.lock(),
            }
        }
    }
}
