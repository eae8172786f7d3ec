use super::assemble::ImageAssembler;
use crate::error::CaptureError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What one `assemble` call saw
#[derive(Debug, Clone)]
pub struct AssemblyCall {
    pub frames: Vec<PathBuf>,
    /// Contents of each frame at call time, in order
    pub contents: Vec<Vec<u8>>,
    pub frame_delay_ms: u32,
    pub output: PathBuf,
}

/// Assembler that snapshots its input and writes a placeholder artifact
#[derive(Clone, Default)]
pub struct RecordingAssembler {
    calls: Arc<Mutex<Vec<AssemblyCall>>>,
    fail: bool,
}

impl RecordingAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<AssemblyCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ImageAssembler for RecordingAssembler {
    fn name(&self) -> &str {
        "recording"
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
        let mut contents = Vec::with_capacity(frames.len());
        for frame in frames {
            contents.push(tokio::fs::read(frame).await.map_err(|e| CaptureError::Assembly {
                details: format!("read {}: {}", frame.display(), e),
            })?);
        }

        self.calls.lock().push(AssemblyCall {
            frames: frames.to_vec(),
            contents,
            frame_delay_ms,
            output: output.to_path_buf(),
        });

        if self.fail {
            return Err(CaptureError::Assembly {
                details: "simulated assembler failure".to_string(),
            });
        }

        tokio::fs::write(output, format!("{} frames", frames.len()))
            .await
            .map_err(|e| CaptureError::Assembly {
                details: e.to_string(),
            })
    }
}
