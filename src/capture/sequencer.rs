use super::assemble::ImageAssembler;
use super::metadata::{save_metadata, CaptureMetadata};
use super::session::{Artifact, CaptureSession};
use super::staging::FrameStage;
use crate::camera::FrameSource;
use crate::config::CaptureConfig;
use crate::error::{CameraError, CaptureError};
use crate::feedback::{FeedbackController, FeedbackState};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// Burst capture followed by assembly into one artifact.
///
/// A session always ends with its staging directory removed and the
/// feedback controller back in [`FeedbackState::Ready`], whatever failed.
pub struct CaptureSequencer {
    camera: Box<dyn FrameSource>,
    assembler: Box<dyn ImageAssembler>,
    output_dir: PathBuf,
    work_dir: PathBuf,
    save_metadata: bool,
    sessions_completed: u64,
}

impl CaptureSequencer {
    pub fn new(
        camera: Box<dyn FrameSource>,
        assembler: Box<dyn ImageAssembler>,
        config: &CaptureConfig,
    ) -> Self {
        Self {
            camera,
            assembler,
            output_dir: PathBuf::from(&config.output_dir),
            work_dir: PathBuf::from(&config.work_dir),
            save_metadata: config.save_metadata,
            sessions_completed: 0,
        }
    }

    pub async fn start(&mut self) -> Result<(), CameraError> {
        info!(
            "Starting capture with {} camera and {} assembler",
            self.camera.name(),
            self.assembler.name()
        );
        self.camera.start().await
    }

    pub async fn shutdown(&mut self) -> Result<(), CameraError> {
        info!("Stopping {} camera", self.camera.name());
        self.camera.stop().await
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn extension(&self) -> &str {
        self.assembler.extension()
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub async fn capture_session(
        &mut self,
        session: &CaptureSession,
        feedback: &mut FeedbackController,
    ) -> Result<Artifact, CaptureError> {
        info!(
            "Gif started: session {} ({} frames, rebound {})",
            session.session_id, session.frame_count, session.rebound
        );
        feedback.enter(FeedbackState::Capturing);

        let result = self.run_session(session, feedback).await;

        match &result {
            Ok(artifact) => {
                self.sessions_completed += 1;
                info!("GIF complete: {}", artifact.path.display());
                feedback.acknowledge_capture().await;
            }
            Err(e) => error!("Capture session {} failed: {}", session.session_id, e),
        }

        feedback.enter(FeedbackState::Ready);
        info!("System ready");
        result
    }

    async fn run_session(
        &mut self,
        session: &CaptureSession,
        feedback: &mut FeedbackController,
    ) -> Result<Artifact, CaptureError> {
        let started_at = Utc::now();
        let mut stage = FrameStage::create(&self.work_dir, &session.session_id).await?;

        let result = self.capture_and_assemble(session, &stage, feedback).await;
        stage.cleanup().await;

        let artifact = result?;
        if self.save_metadata {
            let metadata =
                CaptureMetadata::new(session, &artifact, self.assembler.name(), started_at);
            if let Err(e) = save_metadata(&metadata, &self.output_dir).await {
                warn!("Failed to save metadata for {}: {}", session.session_id, e);
            }
        }

        Ok(artifact)
    }

    async fn capture_and_assemble(
        &mut self,
        session: &CaptureSession,
        stage: &FrameStage,
        feedback: &mut FeedbackController,
    ) -> Result<Artifact, CaptureError> {
        for index in 0..session.frame_count {
            self.camera
                .capture_frame(&stage.frame_path(index))
                .await
                .map_err(|source| CaptureError::Frame {
                    index: index + 1,
                    source,
                })?;
        }

        if session.rebound {
            stage.stage_rebound(session.frame_count).await?;
        }

        let frames = stage.frames().await?;

        feedback.enter(FeedbackState::Assembling);
        info!("Processing GIF from {} frames", frames.len());

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| CaptureError::DirectoryCreation {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let output = self
            .output_dir
            .join(session.artifact_name(self.assembler.extension()));
        self.assembler
            .assemble(&frames, session.frame_delay_ms, &output)
            .await?;

        Ok(Artifact {
            session_id: session.session_id.clone(),
            path: output,
            frame_count: frames.len() as u32,
        })
    }
}
