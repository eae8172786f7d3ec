use super::orchestrator::GifcamOrchestrator;
use crate::error::Result;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

const CAMERA_STOP_TIMEOUT: Duration = Duration::from_secs(10);

impl GifcamOrchestrator {
    /// Stop the camera and release every indicator. Safe to call more
    /// than once; only the first call does anything.
    pub async fn shutdown(&mut self) -> Result<i32> {
        if self.released {
            return Ok(0);
        }
        info!("Beginning graceful shutdown");
        self.shutdown.request(super::ShutdownReason::UserRequest);

        let mut exit_code = 0;

        match timeout(CAMERA_STOP_TIMEOUT, self.sequencer.shutdown()).await {
            Ok(Ok(())) => info!("camera component stopped"),
            Ok(Err(e)) => {
                error!("Error stopping camera component: {}", e);
                exit_code = 1;
            }
            Err(_) => {
                error!("camera component stop timeout");
                exit_code = 1;
            }
        }

        self.feedback.release_all();
        info!("indicator outputs released");

        self.released = true;
        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
