use super::uploader::{remote_path, StorageUploader};
use crate::error::UploadError;
use crate::feedback::{FeedbackController, FeedbackState};
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Outcome of one batch, by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl UploadReport {
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }
}

/// Pushes every artifact in a directory to remote storage, one attempt per
/// file. Connectivity is the caller's concern.
pub struct UploadDispatcher {
    uploader: Box<dyn StorageUploader>,
    extension: String,
}

impl UploadDispatcher {
    pub fn new(uploader: Box<dyn StorageUploader>, extension: &str) -> Self {
        Self {
            uploader,
            extension: extension.to_ascii_lowercase(),
        }
    }

    fn is_artifact(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }

    pub async fn upload_all(
        &self,
        local_dir: &Path,
        remote_folder: &str,
        feedback: &mut FeedbackController,
    ) -> Result<UploadReport, UploadError> {
        feedback.enter(FeedbackState::Uploading);
        info!(
            "Uploading artifacts from {} via {}",
            local_dir.display(),
            self.uploader.name()
        );

        let result = self.upload_dir(local_dir, remote_folder).await;

        feedback.enter(FeedbackState::Ready);
        if let Ok(report) = &result {
            info!(
                "Upload complete: {} of {} attempted uploaded, {} failed",
                report.uploaded.len(),
                report.attempted(),
                report.failed.len()
            );
        }
        result
    }

    async fn upload_dir(
        &self,
        local_dir: &Path,
        remote_folder: &str,
    ) -> Result<UploadReport, UploadError> {
        let read_error = |source| UploadError::Read {
            path: local_dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(local_dir).await.map_err(read_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            // Follows symlinks
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();

        let mut report = UploadReport::default();
        for name in names {
            if !self.is_artifact(&name) {
                report.skipped.push(name);
                continue;
            }

            let local_path = local_dir.join(&name);
            let target = remote_path(remote_folder, &name);
            match self.upload_file(&local_path, &target).await {
                Ok(()) => {
                    info!("Uploaded '{}' -> '{}'", local_path.display(), target);
                    report.uploaded.push(name);
                }
                Err(e) => {
                    error!("Failed to upload '{}': {}", local_path.display(), e);
                    report.failed.push(name);
                }
            }
        }

        Ok(report)
    }

    async fn upload_file(&self, local_path: &Path, target: &str) -> Result<(), UploadError> {
        let contents = fs::read(local_path)
            .await
            .map_err(|source| UploadError::Read {
                path: local_path.to_path_buf(),
                source,
            })?;
        self.uploader.upload(contents, target).await
    }
}
