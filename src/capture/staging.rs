use crate::error::CaptureError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const FRAME_EXTENSION: &str = "jpg";

/// Per-session scratch directory holding `0000.jpg`, `0001.jpg`, ...
///
/// The directory is removed by [`FrameStage::cleanup`], or on drop if a
/// session bails out before reaching it.
pub struct FrameStage {
    dir: PathBuf,
    removed: bool,
}

impl FrameStage {
    pub async fn create(work_dir: &Path, session_id: &str) -> Result<Self, CaptureError> {
        let dir = work_dir.join(session_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| CaptureError::DirectoryCreation {
                path: dir.display().to_string(),
                source,
            })?;

        debug!("Staging frames in {}", dir.display());
        Ok(Self {
            dir,
            removed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the zero-based frame `index`
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{:04}.{}", index, FRAME_EXTENSION))
    }

    /// Append frames N-1 down to 1 (one-based) after the N captured ones,
    /// so the staged sequence plays forward and back. Returns how many
    /// frames were added.
    pub async fn stage_rebound(&self, frame_count: u32) -> Result<u32, CaptureError> {
        let mirrored = frame_count.saturating_sub(1);

        for i in 0..mirrored {
            let src = self.frame_path(frame_count - 2 - i);
            let dst = self.frame_path(frame_count + i);
            fs::copy(&src, &dst)
                .await
                .map_err(|source| CaptureError::Staging { path: dst, source })?;
        }

        debug!("Staged {} rebound frames", mirrored);
        Ok(mirrored)
    }

    /// Every staged frame, in ascending filename order
    pub async fn frames(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let staging_error = |source| CaptureError::Staging {
            path: self.dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.dir).await.map_err(staging_error)?;
        let mut frames = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(staging_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(FRAME_EXTENSION) {
                frames.push(path);
            }
        }

        frames.sort();
        Ok(frames)
    }

    /// Remove the directory and everything in it
    pub async fn cleanup(&mut self) {
        if self.removed {
            return;
        }
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!("Removed staging directory {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staging directory {}: {}", self.dir.display(), e),
        }
        self.removed = true;
    }
}

impl Drop for FrameStage {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }
}
