use super::interface::FrameSource;
use super::still_command::StillCommandCamera;
use crate::config::{CameraBackend, CameraConfig};
use crate::error::{GifcamError, Result};

/// Builder for the configured frame source
pub struct CameraInterfaceBuilder {
    config: Option<CameraConfig>,
}

impl CameraInterfaceBuilder {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn config(mut self, config: CameraConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Box<dyn FrameSource>> {
        let config = self
            .config
            .ok_or_else(|| GifcamError::system("Camera configuration must be specified"))?;

        build_frame_source(&config)
    }
}

impl Default for CameraInterfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the frame source implementation named by `config.backend`
pub fn build_frame_source(config: &CameraConfig) -> Result<Box<dyn FrameSource>> {
    match config.backend {
        CameraBackend::StillCommand => Ok(Box::new(StillCommandCamera::new(config.clone()))),
        CameraBackend::Gstreamer => {
            #[cfg(all(target_os = "linux", feature = "camera"))]
            {
                Ok(Box::new(super::GstCamera::new(config.clone())?))
            }

            #[cfg(not(all(target_os = "linux", feature = "camera")))]
            {
                Err(crate::error::CameraError::Configuration {
                    details: "GStreamer backend requires the `camera` feature on Linux".to_string(),
                }
                .into())
            }
        }
    }
}
