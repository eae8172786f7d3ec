use crate::capture::Artifact;
use crate::upload::UploadReport;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// System shutdown reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
    UserRequest,
}

/// What one pass of the main loop did
#[derive(Debug, Clone)]
pub enum TickOutcome {
    Idle,
    Captured(Artifact),
    CaptureFailed(String),
    Uploaded(UploadReport),
    UploadFailed(String),
    /// Upload requested with no connectivity; the alert was shown instead
    UploadBlocked,
}

/// Cloneable trigger that asks the main loop to stop. The first reason
/// given wins.
#[derive(Clone)]
pub struct ShutdownHandle {
    token: CancellationToken,
    reason: Arc<Mutex<Option<ShutdownReason>>>,
}

impl ShutdownHandle {
    pub(super) fn new(token: CancellationToken) -> Self {
        Self {
            token,
            reason: Arc::new(Mutex::new(None)),
        }
    }

    pub fn request(&self, reason: ShutdownReason) {
        {
            let mut slot = self.reason.lock();
            if slot.is_none() {
                *slot = Some(reason);
            }
        }
        self.token.cancel();
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.lock().clone()
    }

    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
