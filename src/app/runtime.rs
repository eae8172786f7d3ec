use super::orchestrator::GifcamOrchestrator;
use super::state::Mode;
use super::types::{ShutdownHandle, ShutdownReason, TickOutcome};
use crate::capture::CaptureSession;
use crate::error::Result;
use crate::feedback::FeedbackState;
use std::time::Duration;
use tokio::signal;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

impl GifcamOrchestrator {
    /// Run the polling loop until shutdown is requested, then release
    /// everything. Returns the process exit code.
    pub async fn run(&mut self) -> Result<i32> {
        info!("Gifcam main loop running");

        let handle = self.shutdown_handle();
        Self::setup_signal_handlers(&handle);

        let idle = Duration::from_millis(self.config.control.tick_interval_ms);
        while !handle.is_requested() {
            if let TickOutcome::Idle = self.tick().await {
                tokio::select! {
                    _ = handle.cancelled() => {}
                    _ = sleep(idle) => {}
                }
            }
        }

        let reason = handle.reason().unwrap_or(ShutdownReason::UserRequest);
        info!("Shutdown initiated: {:?}", reason);

        let exit_code = self.shutdown().await?;
        info!("Gifcam system shutdown complete");
        Ok(exit_code)
    }

    /// One pass of the loop. Capture and upload run to completion inside it.
    pub async fn tick(&mut self) -> TickOutcome {
        let now = Instant::now();

        if let Some(connected) = self.connectivity.refresh_if_due(now).await {
            self.state.record_probe(connected, now);
            self.feedback.show_connectivity(connected);
        }

        if self.shutter.poll(now) {
            return self.capture().await;
        }

        if self.upload_button.poll(now) {
            return self.upload().await;
        }

        self.feedback.enter(FeedbackState::Ready);
        TickOutcome::Idle
    }

    async fn capture(&mut self) -> TickOutcome {
        let session = match CaptureSession::from_config(&self.config.capture) {
            Ok(session) => session,
            Err(e) => {
                error!("Cannot start capture: {}", e);
                return TickOutcome::CaptureFailed(e.to_string());
            }
        };

        if !self.state.begin(Mode::Capturing) {
            return TickOutcome::CaptureFailed("loop busy".to_string());
        }
        let result = self
            .sequencer
            .capture_session(&session, &mut self.feedback)
            .await;
        self.state.finish();

        match result {
            Ok(artifact) => TickOutcome::Captured(artifact),
            Err(e) => TickOutcome::CaptureFailed(e.to_string()),
        }
    }

    async fn upload(&mut self) -> TickOutcome {
        if !self.state.wifi_connected() {
            error!("No connectivity, aborting upload");
            self.feedback.render_alert().await;
            return TickOutcome::UploadBlocked;
        }

        if !self.state.begin(Mode::Uploading) {
            return TickOutcome::UploadFailed("loop busy".to_string());
        }
        let result = self
            .dispatcher
            .upload_all(
                self.sequencer.output_dir(),
                &self.config.upload.remote_folder,
                &mut self.feedback,
            )
            .await;
        self.state.finish();

        match result {
            Ok(report) => TickOutcome::Uploaded(report),
            Err(e) => {
                error!("Upload batch failed: {}", e);
                TickOutcome::UploadFailed(e.to_string())
            }
        }
    }

    /// SIGINT and SIGTERM both request shutdown
    fn setup_signal_handlers(handle: &ShutdownHandle) {
        #[cfg(unix)]
        {
            let sigterm_handle = handle.clone();
            tokio::spawn(async move {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if let Some(()) = sigterm.recv().await {
                            info!("Received SIGTERM signal");
                            sigterm_handle.request(ShutdownReason::Signal("SIGTERM".to_string()));
                        }
                    }
                    Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        let sigint_handle = handle.clone();
        tokio::spawn(async move {
            if let Ok(()) = signal::ctrl_c().await {
                info!("Received SIGINT signal (Ctrl+C)");
                sigint_handle.request(ShutdownReason::Signal("SIGINT".to_string()));
            }
        });
    }
}
