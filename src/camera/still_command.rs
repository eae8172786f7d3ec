use super::interface::FrameSource;
use crate::config::{CameraConfig, Rotation};
use crate::error::CameraError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Frame source that shells out to a libcamera still tool (`rpicam-still`)
/// once per frame. Rotation is applied afterwards because the tool only
/// flips by 180 degrees.
pub struct StillCommandCamera {
    config: CameraConfig,
    started: bool,
}

impl StillCommandCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            started: false,
        }
    }

    pub(crate) fn command_args(&self, path: &Path) -> Vec<String> {
        let (width, height) = self.config.resolution;
        vec![
            "--nopreview".to_string(),
            "--immediate".to_string(),
            "--width".to_string(),
            width.to_string(),
            "--height".to_string(),
            height.to_string(),
            "--quality".to_string(),
            self.config.jpeg_quality.to_string(),
            "--encoding".to_string(),
            "jpg".to_string(),
            "--output".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    async fn run_still_command(&self, path: &Path) -> Result<(), CameraError> {
        let child = Command::new(&self.config.still_command)
            .args(self.command_args(path))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CameraError::Command {
                command: self.config.still_command.clone(),
                details: format!("spawn failed: {}", e),
            })?;

        let timeout_ms = self.config.frame_timeout_ms;
        let output = tokio::time::timeout(Duration::from_millis(timeout_ms), child.wait_with_output())
            .await
            .map_err(|_| CameraError::Timeout { timeout_ms })?
            .map_err(|e| CameraError::Command {
                command: self.config.still_command.clone(),
                details: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CameraError::Command {
                command: self.config.still_command.clone(),
                details: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

/// Rotate a JPEG in place, re-encoding at `quality`
pub(crate) fn rotate_jpeg(path: &Path, rotation: Rotation, quality: u8) -> Result<(), CameraError> {
    let frame_error = |details: String| CameraError::Frame {
        path: path.to_path_buf(),
        details,
    };

    let image = image::open(path).map_err(|e| frame_error(format!("decode failed: {}", e)))?;
    let rotated = match rotation {
        Rotation::Rotate90 => image.rotate90(),
        Rotation::Rotate180 => image.rotate180(),
        Rotation::Rotate270 => image.rotate270(),
    };

    let file = std::fs::File::create(path).map_err(|e| frame_error(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&rotated)
        .map_err(|e| frame_error(format!("encode failed: {}", e)))?;

    Ok(())
}

#[async_trait]
impl FrameSource for StillCommandCamera {
    fn name(&self) -> &str {
        "still_command"
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        info!(
            "Using '{}' for stills at {}x{}",
            self.config.still_command, self.config.resolution.0, self.config.resolution.1
        );
        self.started = true;
        Ok(())
    }

    async fn capture_frame(&mut self, path: &Path) -> Result<(), CameraError> {
        if !self.started {
            return Err(CameraError::NotStarted);
        }

        self.run_still_command(path).await?;

        if let Some(rotation) = self.config.rotation {
            let owned: PathBuf = path.to_path_buf();
            let quality = self.config.jpeg_quality;
            tokio::task::spawn_blocking(move || rotate_jpeg(&owned, rotation, quality))
                .await
                .map_err(|e| CameraError::Frame {
                    path: path.to_path_buf(),
                    details: format!("rotation task failed: {}", e),
                })??;
        }

        debug!("Captured still {}", path.display());
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        self.started = false;
        Ok(())
    }
}
