use super::session::{Artifact, CaptureSession};
use crate::error::{GifcamError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Sidecar describing how an artifact was made
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub captured_frames: u32,
    pub staged_frames: u32,
    pub frame_delay_ms: u32,
    pub rebound: bool,
    pub assembler: String,
    pub artifact: String,
}

impl CaptureMetadata {
    pub fn new(
        session: &CaptureSession,
        artifact: &Artifact,
        assembler: &str,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session.session_id.clone(),
            started_at,
            completed_at: Utc::now(),
            captured_frames: session.frame_count,
            staged_frames: artifact.frame_count,
            frame_delay_ms: session.frame_delay_ms,
            rebound: session.rebound,
            assembler: assembler.to_string(),
            artifact: artifact
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Write `{output_dir}/metadata/{session_id}.json`
pub(crate) async fn save_metadata(metadata: &CaptureMetadata, output_dir: &Path) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(metadata).map_err(|e| {
        GifcamError::component("capture", &format!("Failed to serialize metadata: {}", e))
    })?;

    let metadata_dir = output_dir.join("metadata");
    fs::create_dir_all(&metadata_dir).await.map_err(|e| {
        GifcamError::component(
            "capture",
            &format!("Failed to create metadata directory: {}", e),
        )
    })?;

    let metadata_path = metadata_dir.join(format!("{}.json", metadata.session_id));
    fs::write(&metadata_path, metadata_json)
        .await
        .map_err(|e| {
            GifcamError::component("capture", &format!("Failed to write metadata file: {}", e))
        })?;

    debug!("Saved metadata to {}", metadata_path.display());
    Ok(())
}
