use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GifcamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("Control input error: {0}")]
    Control(String),

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera configuration failed: {details}")]
    Configuration { details: String },

    #[error("Camera not started")]
    NotStarted,

    #[error("Frame capture to {path} failed: {details}")]
    Frame { path: PathBuf, details: String },

    #[error("Still command '{command}' failed: {details}")]
    Command { command: String, details: String },

    #[error("Frame capture timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame {index} failed: {source}")]
    Frame {
        index: u32,
        #[source]
        source: CameraError,
    },

    #[error("Failed to stage rebound frame {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Assembly failed: {details}")]
    Assembly { details: String },

    #[error("Invalid session: {details}")]
    InvalidSession { details: String },
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote rejected {path} with status {status}: {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Upload not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Indicator {indicator} unavailable: {details}")]
    Unavailable { indicator: String, details: String },

    #[error("Indicator {indicator} cannot hold a timed pattern")]
    NotStatic { indicator: String },

    #[error("Indicator {indicator} output failed: {details}")]
    Output { indicator: String, details: String },
}

impl GifcamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GifcamError>;
