use super::interface::FrameSource;
use crate::error::CameraError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared record of what a [`MockFrameSource`] did
#[derive(Debug, Default)]
pub struct MockCameraLog {
    pub started: bool,
    pub stop_calls: u32,
    pub captured: Vec<PathBuf>,
}

/// Frame source for tests without camera hardware.
///
/// Frame `n` (1-based, per source lifetime) is written either as the text
/// `frame-n` or, with [`MockFrameSource::with_jpeg`], as a small solid JPEG
/// whose grey level encodes `n`.
#[derive(Clone)]
pub struct MockFrameSource {
    log: Arc<Mutex<MockCameraLog>>,
    jpeg_size: Option<(u32, u32)>,
    fail_on_frame: Option<usize>,
    counter: Arc<Mutex<usize>>,
}

impl MockFrameSource {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(MockCameraLog::default())),
            jpeg_size: None,
            fail_on_frame: None,
            counter: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_jpeg(mut self, width: u32, height: u32) -> Self {
        self.jpeg_size = Some((width, height));
        self
    }

    /// Fail the `n`th capture (1-based)
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_frame = Some(n);
        self
    }

    pub fn log(&self) -> Arc<Mutex<MockCameraLog>> {
        Arc::clone(&self.log)
    }

    fn write_frame(&self, path: &Path, n: usize) -> Result<(), CameraError> {
        let frame_error = |details: String| CameraError::Frame {
            path: path.to_path_buf(),
            details,
        };

        match self.jpeg_size {
            None => std::fs::write(path, format!("frame-{}", n))
                .map_err(|e| frame_error(e.to_string())),
            Some((width, height)) => {
                let level = ((n * 23) % 256) as u8;
                let image = RgbImage::from_pixel(width, height, Rgb([level, level, level]));
                let file = std::fs::File::create(path).map_err(|e| frame_error(e.to_string()))?;
                let mut writer = std::io::BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, 90)
                    .encode_image(&image)
                    .map_err(|e| frame_error(e.to_string()))
            }
        }
    }
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSource for MockFrameSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        self.log.lock().started = true;
        Ok(())
    }

    async fn capture_frame(&mut self, path: &Path) -> Result<(), CameraError> {
        let n = {
            let mut counter = self.counter.lock();
            *counter += 1;
            *counter
        };

        if self.fail_on_frame == Some(n) {
            return Err(CameraError::Frame {
                path: path.to_path_buf(),
                details: "simulated sensor failure".to_string(),
            });
        }

        self.write_frame(path, n)?;
        self.log.lock().captured.push(path.to_path_buf());
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        let mut log = self.log.lock();
        log.started = false;
        log.stop_calls += 1;
        Ok(())
    }
}
