pub mod app;
pub mod camera;
pub mod capture;
pub mod config;
pub mod connectivity;
pub mod controls;
pub mod error;
pub mod feedback;
pub mod upload;

pub use app::{Components, GifcamOrchestrator, Mode, ShutdownHandle, ShutdownReason, SystemState, TickOutcome};
pub use camera::{CameraInterfaceBuilder, FrameSource};
pub use capture::{Artifact, CaptureSequencer, CaptureSession, ImageAssembler};
pub use config::GifcamConfig;
pub use connectivity::{ConnectivityMonitor, ConnectivityProbe, TcpProbe};
pub use controls::{ButtonMonitor, ControlInput};
pub use error::{GifcamError, Result};
pub use feedback::{FeedbackController, FeedbackState, Indicator, LedPattern};
pub use upload::{StorageUploader, UploadDispatcher, UploadReport};
