use crate::error::UploadError;
use async_trait::async_trait;

/// Remote file storage. Uploads always overwrite an existing file of the
/// same name.
#[async_trait]
pub trait StorageUploader: Send + Sync {
    fn name(&self) -> &str;

    async fn upload(&self, contents: Vec<u8>, remote_path: &str) -> Result<(), UploadError>;
}

/// Join a remote folder and a file name with exactly one `/`
pub fn remote_path(remote_folder: &str, file_name: &str) -> String {
    format!("{}/{}", remote_folder.trim_end_matches('/'), file_name)
}
