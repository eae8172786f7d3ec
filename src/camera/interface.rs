use crate::error::CameraError;
use async_trait::async_trait;
use std::path::Path;

/// Still-frame camera used by the capture sequencer.
///
/// Resolution and orientation are fixed when the source is built; a session
/// only decides where each frame lands.
#[async_trait]
pub trait FrameSource: Send {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Acquire the sensor and begin streaming
    async fn start(&mut self) -> Result<(), CameraError>;

    /// Write exactly one JPEG still to `path`
    async fn capture_frame(&mut self, path: &Path) -> Result<(), CameraError>;

    /// Release the sensor. Safe to call more than once.
    async fn stop(&mut self) -> Result<(), CameraError>;
}
