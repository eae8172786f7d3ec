use crate::config::CaptureConfig;
use crate::error::CaptureError;
use std::path::PathBuf;

/// Length of a generated session id
pub const SESSION_ID_LEN: usize = 10;

/// Parameters of one shutter press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    pub session_id: String,
    pub frame_count: u32,
    pub frame_delay_ms: u32,
    pub rebound: bool,
}

impl CaptureSession {
    pub fn new(frame_count: u32, frame_delay_ms: u32, rebound: bool) -> Result<Self, CaptureError> {
        Self::with_id(generate_session_id(), frame_count, frame_delay_ms, rebound)
    }

    pub fn with_id(
        session_id: String,
        frame_count: u32,
        frame_delay_ms: u32,
        rebound: bool,
    ) -> Result<Self, CaptureError> {
        if frame_count == 0 {
            return Err(CaptureError::InvalidSession {
                details: "frame count must be at least 1".to_string(),
            });
        }
        if session_id.is_empty() || !session_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CaptureError::InvalidSession {
                details: format!("session id '{}' is not alphanumeric", session_id),
            });
        }

        Ok(Self {
            session_id,
            frame_count,
            frame_delay_ms,
            rebound,
        })
    }

    pub fn from_config(config: &CaptureConfig) -> Result<Self, CaptureError> {
        Self::new(config.frame_count, config.frame_delay_ms, config.rebound)
    }

    /// Frames handed to the assembler: N, or 2N-1 with rebound
    pub fn staged_frame_count(&self) -> u32 {
        if self.rebound {
            self.frame_count * 2 - 1
        } else {
            self.frame_count
        }
    }

    pub fn artifact_name(&self, extension: &str) -> String {
        format!("{}-0.{}", self.session_id, extension)
    }
}

/// Random uppercase alphanumeric id. Collisions are not checked for.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(SESSION_ID_LEN)
        .collect()
}

/// A finished animation on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub session_id: String,
    pub path: PathBuf,
    pub frame_count: u32,
}
