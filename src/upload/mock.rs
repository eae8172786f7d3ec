use super::uploader::StorageUploader;
use crate::error::UploadError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// One `upload` call: remote path and payload size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    pub remote_path: String,
    pub size: usize,
}

/// Uploader that records calls and rejects selected file names
#[derive(Clone, Default)]
pub struct MockUploader {
    calls: Arc<Mutex<Vec<UploadCall>>>,
    failing: HashSet<String>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject uploads whose remote path ends in `/{file_name}`
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<UploadCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl StorageUploader for MockUploader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, contents: Vec<u8>, remote_path: &str) -> Result<(), UploadError> {
        self.calls.lock().push(UploadCall {
            remote_path: remote_path.to_string(),
            size: contents.len(),
        });

        let file_name = remote_path.rsplit('/').next().unwrap_or(remote_path);
        if self.failing.contains(file_name) {
            return Err(UploadError::Rejected {
                path: remote_path.to_string(),
                status: 500,
                body: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}
