use super::state::SystemState;
use super::types::ShutdownHandle;
use crate::camera::FrameSource;
use crate::capture::{CaptureSequencer, ImageAssembler};
use crate::config::GifcamConfig;
use crate::connectivity::{ConnectivityMonitor, ConnectivityProbe};
use crate::controls::{ButtonMonitor, ControlInput};
use crate::feedback::{FeedbackController, Indicators};
use crate::upload::{StorageUploader, UploadDispatcher};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Every collaborator the loop drives, already opened
pub struct Components {
    pub camera: Box<dyn FrameSource>,
    pub assembler: Box<dyn ImageAssembler>,
    pub uploader: Box<dyn StorageUploader>,
    pub probe: Box<dyn ConnectivityProbe>,
    pub indicators: Indicators,
    pub shutter: Box<dyn ControlInput>,
    pub upload_button: Box<dyn ControlInput>,
}

/// Main application coordinator: owns all state the polling loop touches
pub struct GifcamOrchestrator {
    pub(super) config: GifcamConfig,
    pub(super) state: SystemState,
    pub(super) sequencer: CaptureSequencer,
    pub(super) dispatcher: UploadDispatcher,
    pub(super) connectivity: ConnectivityMonitor,
    pub(super) feedback: FeedbackController,
    pub(super) shutter: ButtonMonitor,
    pub(super) upload_button: ButtonMonitor,
    pub(super) shutdown: ShutdownHandle,
    pub(super) released: bool,
}

impl GifcamOrchestrator {
    /// Assemble an orchestrator from already-built collaborators
    pub fn from_components(config: GifcamConfig, components: Components) -> Self {
        let sequencer =
            CaptureSequencer::new(components.camera, components.assembler, &config.capture);
        let dispatcher = UploadDispatcher::new(components.uploader, sequencer.extension());
        let connectivity = ConnectivityMonitor::new(
            components.probe,
            Duration::from_secs(config.network.check_interval_seconds),
        );
        let feedback = FeedbackController::new(components.indicators, &config.feedback);

        let debounce = Duration::from_millis(config.control.debounce_ms);
        let shutter = ButtonMonitor::new(
            components.shutter,
            config.control.shutter_trigger,
            debounce,
        );
        let upload_button = ButtonMonitor::new(
            components.upload_button,
            config.control.upload_trigger,
            debounce,
        );

        Self {
            config,
            state: SystemState::new(),
            sequencer,
            dispatcher,
            connectivity,
            feedback,
            shutter,
            upload_button,
            shutdown: ShutdownHandle::new(CancellationToken::new()),
            released: false,
        }
    }

    /// Handle that stops [`GifcamOrchestrator::run`] from elsewhere
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn feedback(&self) -> &FeedbackController {
        &self.feedback
    }

    pub fn config(&self) -> &GifcamConfig {
        &self.config
    }
}
