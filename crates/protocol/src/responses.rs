//! Structured results returned by the caller-facing operations.
//!
//! Every failure is reported through these shapes; callers never see a
//! raised error.

use serde::{Deserialize, Serialize};

use crate::manifest::MapManifest;

/// Outcome flag of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "err")]
    Err,
}

/// `{status, message}` result of `delete` and `start_game`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    pub message: String,
}

pub type DeleteResponse = StatusResponse;
pub type StartGameResponse = StatusResponse;

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: Status::Err,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// `{status, message, manifest?}` result of `import`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<MapManifest>,
}

impl ImportResponse {
    pub fn success(manifest: MapManifest) -> Self {
        Self {
            status: Status::Success,
            message: "Map imported successfully!".into(),
            manifest: Some(manifest),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: Status::Err,
            message: message.into(),
            manifest: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
