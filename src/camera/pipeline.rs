use super::interface::FrameSource;
use crate::config::{CameraConfig, Rotation};
use crate::error::CameraError;
use async_trait::async_trait;
use gstreamer::prelude::*;
use gstreamer::Pipeline;
use gstreamer_app::AppSink;
use std::path::Path;
use tracing::{debug, info, trace};

/// libcamera still source built on a GStreamer pipeline.
///
/// The pipeline keeps one JPEG in the appsink (`drop=true`), so each
/// `capture_frame` hands back the freshest frame the sensor produced.
pub struct GstCamera {
    config: CameraConfig,
    pipeline: Option<Pipeline>,
    appsink: Option<AppSink>,
}

impl GstCamera {
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        gstreamer::init().map_err(|e| CameraError::Configuration {
            details: format!("Failed to initialize GStreamer: {}", e),
        })?;

        Ok(Self {
            config,
            pipeline: None,
            appsink: None,
        })
    }

    fn build_pipeline_string(&self) -> String {
        let (width, height) = self.config.resolution;

        let mut pipeline = format!(
            "libcamerasrc ! video/x-raw,width={},height={} ! videoconvert",
            width, height
        );

        if let Some(rotation) = &self.config.rotation {
            let flip_method = match rotation {
                Rotation::Rotate90 => "clockwise",
                Rotation::Rotate180 => "rotate-180",
                Rotation::Rotate270 => "counterclockwise",
            };
            pipeline.push_str(&format!(" ! videoflip method={}", flip_method));
        }

        pipeline.push_str(&format!(
            " ! jpegenc quality={} ! \
             appsink name=sink sync=false max-buffers=1 drop=true emit-signals=false",
            self.config.jpeg_quality
        ));

        pipeline
    }
}

#[async_trait]
impl FrameSource for GstCamera {
    fn name(&self) -> &str {
        "gstreamer"
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        if self.pipeline.is_some() {
            debug!("GStreamer camera already started");
            return Ok(());
        }

        let pipeline_desc = self.build_pipeline_string();
        info!("Creating GStreamer still pipeline: {}", pipeline_desc);

        let pipeline = gstreamer::parse::launch(&pipeline_desc)
            .map_err(|e| CameraError::Configuration {
                details: format!("Failed to create pipeline: {}", e),
            })?
            .downcast::<Pipeline>()
            .map_err(|_| CameraError::Configuration {
                details: "Failed to downcast to Pipeline".to_string(),
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::Configuration {
                details: "Failed to get appsink element".to_string(),
            })?
            .downcast::<AppSink>()
            .map_err(|_| CameraError::Configuration {
                details: "Failed to downcast to AppSink".to_string(),
            })?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CameraError::Configuration {
                details: format!("Failed to start pipeline: {}", e),
            })?;

        info!(
            "Camera streaming at {}x{}",
            self.config.resolution.0, self.config.resolution.1
        );

        self.pipeline = Some(pipeline);
        self.appsink = Some(appsink);
        Ok(())
    }

    async fn capture_frame(&mut self, path: &Path) -> Result<(), CameraError> {
        let appsink = self.appsink.clone().ok_or(CameraError::NotStarted)?;
        let timeout_ms = self.config.frame_timeout_ms;

        let bytes = tokio::task::spawn_blocking(move || {
            let sample = appsink
                .try_pull_sample(gstreamer::ClockTime::from_mseconds(timeout_ms))
                .ok_or(CameraError::Timeout { timeout_ms })?;
            let buffer = sample.buffer().ok_or_else(|| CameraError::Configuration {
                details: "No buffer in sample".to_string(),
            })?;
            let map = buffer
                .map_readable()
                .map_err(|e| CameraError::Configuration {
                    details: format!("Failed to map buffer: {}", e),
                })?;
            Ok::<_, CameraError>(map.as_slice().to_vec())
        })
        .await
        .map_err(|e| CameraError::Frame {
            path: path.to_path_buf(),
            details: format!("Capture task failed: {}", e),
        })??;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| CameraError::Frame {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        trace!("Wrote still {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        self.appsink = None;
        if let Some(pipeline) = self.pipeline.take() {
            pipeline
                .set_state(gstreamer::State::Null)
                .map_err(|e| CameraError::Configuration {
                    details: format!("Failed to stop pipeline: {}", e),
                })?;
            info!("GStreamer camera stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GifcamConfig;

    #[test]
    fn test_pipeline_string_applies_rotation_and_quality() {
        let config = GifcamConfig::default().camera;
        let Ok(camera) = GstCamera::new(config) else {
            println!("GStreamer not available - skipping pipeline string test");
            return;
        };

        let desc = camera.build_pipeline_string();
        assert!(desc.starts_with("libcamerasrc"));
        assert!(desc.contains("width=540,height=405"));
        assert!(desc.contains("videoflip method=clockwise"));
        assert!(desc.contains("jpegenc quality=85"));
        assert!(desc.contains("drop=true"));
    }
}
