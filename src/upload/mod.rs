mod dispatcher;
mod dropbox;
pub mod mock;
#[cfg(test)]
mod tests;
mod uploader;

pub use dispatcher::{UploadDispatcher, UploadReport};
pub use dropbox::DropboxUploader;
pub use uploader::{remote_path, StorageUploader};
