use super::uploader::StorageUploader;
use crate::config::UploadConfig;
use crate::error::UploadError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
    mute: bool,
}

/// Dropbox content API `files/upload` with a long-lived access token
pub struct DropboxUploader {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl DropboxUploader {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// `Dropbox-API-Arg` value. Header values must be ASCII, so anything
    /// else in the path is sent as a JSON `\u` escape.
    pub(crate) fn api_arg(remote_path: &str) -> String {
        let arg = UploadArg {
            path: remote_path,
            mode: "overwrite",
            autorename: false,
            mute: true,
        };
        // Serializing a struct of strings and bools cannot fail
        let json = serde_json::to_string(&arg).unwrap_or_default();
        header_safe(&json)
    }
}

fn header_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[async_trait]
impl StorageUploader for DropboxUploader {
    fn name(&self) -> &str {
        "dropbox"
    }

    async fn upload(&self, contents: Vec<u8>, remote_path: &str) -> Result<(), UploadError> {
        if self.access_token.is_empty() {
            return Err(UploadError::NotConfigured(
                "upload.access_token is empty".to_string(),
            ));
        }

        let size = contents.len();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", Self::api_arg(remote_path))
            .header("Content-Type", "application/octet-stream")
            .body(contents)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                path: remote_path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!("Dropbox accepted {} bytes for {}", size, remote_path);
        Ok(())
    }
}
