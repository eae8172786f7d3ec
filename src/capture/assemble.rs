use crate::error::CaptureError;
use async_trait::async_trait;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Turns an ordered list of stills into one animated artifact
#[async_trait]
pub trait ImageAssembler: Send + Sync {
    fn name(&self) -> &str;

    /// File extension of the produced artifact, without the dot
    fn extension(&self) -> &str;

    async fn assemble(
        &self,
        frames: &[PathBuf],
        frame_delay_ms: u32,
        output: &Path,
    ) -> Result<(), CaptureError>;
}

fn assembly_error(details: impl Into<String>) -> CaptureError {
    CaptureError::Assembly {
        details: details.into(),
    }
}

/// GIF frame delays are stored in centiseconds. Rounds to the nearest
/// centisecond and never returns 0, which viewers replace with their own
/// default.
pub fn gif_delay_centiseconds(frame_delay_ms: u32) -> u32 {
    (frame_delay_ms.saturating_add(5) / 10).max(1)
}

/// NeuQuant sampling factor; 1 is best quality and slowest
const GIF_ENCODER_SPEED: i32 = 10;

/// In-process GIF encoder. Output is a pure function of the frame bytes
/// and the delay, and loops forever.
#[derive(Debug, Default, Clone)]
pub struct NativeGifAssembler;

impl NativeGifAssembler {
    pub fn new() -> Self {
        Self
    }

    fn encode(frames: &[PathBuf], frame_delay_ms: u32, output: &Path) -> Result<(), CaptureError> {
        let partial = output.with_extension("gif.part");

        let result = Self::write_frames(frames, frame_delay_ms, &partial).and_then(|()| {
            std::fs::rename(&partial, output)
                .map_err(|e| assembly_error(format!("rename to {}: {}", output.display(), e)))
        });
        if result.is_err() {
            let _ = std::fs::remove_file(&partial);
        }
        result
    }

    fn write_frames(frames: &[PathBuf], frame_delay_ms: u32, partial: &Path) -> Result<(), CaptureError> {
        let file = File::create(partial)
            .map_err(|e| assembly_error(format!("create {}: {}", partial.display(), e)))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_ENCODER_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| assembly_error(e.to_string()))?;

        let delay_ms = gif_delay_centiseconds(frame_delay_ms).saturating_mul(10);
        for path in frames {
            let rgba = image::open(path)
                .map_err(|e| assembly_error(format!("decode {}: {}", path.display(), e)))?
                .to_rgba8();
            let frame = Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            encoder
                .encode_frame(frame)
                .map_err(|e| assembly_error(format!("encode {}: {}", path.display(), e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ImageAssembler for NativeGifAssembler {
    fn name(&self) -> &str {
        "native"
    }

    fn extension(&self) -> &str {
        "gif"
    }

    async fn assemble(
        &self,
        frames: &[PathBuf],
        frame_delay_ms: u32,
        output: &Path,
    ) -> Result<(), CaptureError> {
        if frames.is_empty() {
            return Err(assembly_error("no frames to assemble"));
        }

        let frames = frames.to_vec();
        let target = output.to_path_buf();
        tokio::task::spawn_blocking(move || Self::encode(&frames, frame_delay_ms, &target))
            .await
            .map_err(|e| assembly_error(format!("encoder task failed: {}", e)))??;

        debug!("Encoded GIF {}", output.display());
        Ok(())
    }
}

/// Runs `gm convert`. GraphicsMagick takes the delay in centiseconds.
#[derive(Debug, Clone)]
pub struct GraphicsMagickAssembler {
    command: String,
}

impl GraphicsMagickAssembler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub(crate) fn command_args(frames: &[PathBuf], frame_delay_ms: u32, output: &Path) -> Vec<String> {
        let mut args = vec![
            "convert".to_string(),
            "-delay".to_string(),
            gif_delay_centiseconds(frame_delay_ms).to_string(),
            "-loop".to_string(),
            "0".to_string(),
        ];
        args.extend(frames.iter().map(|p| p.to_string_lossy().to_string()));
        args.push(output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl ImageAssembler for GraphicsMagickAssembler {
    fn name(&self) -> &str {
        "graphicsmagick"
    }

    fn extension(&self) -> &str {
        "gif"
    }

    async fn assemble(
        &self,
        frames: &[PathBuf],
        frame_delay_ms: u32,
        output: &Path,
    ) -> Result<(), CaptureError> {
        if frames.is_empty() {
            return Err(assembly_error("no frames to assemble"));
        }

        let output_result = Command::new(&self.command)
            .args(Self::command_args(frames, frame_delay_ms, output))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| assembly_error(format!("failed to run '{}': {}", self.command, e)))?;

        if !output_result.status.success() {
            let _ = tokio::fs::remove_file(output).await;
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            return Err(assembly_error(format!(
                "'{}' exited with {}: {}",
                self.command,
                output_result.status,
                stderr.trim()
            )));
        }

        debug!("GraphicsMagick wrote {}", output.display());
        Ok(())
    }
}
