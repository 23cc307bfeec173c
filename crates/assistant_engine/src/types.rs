use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend routes, relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Upload,
    Ask,
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Upload => "upload/",
            Endpoint::Ask => "ask/",
            Endpoint::Health => "health/",
        }
    }

    fn failure_label(self) -> &'static str {
        match self {
            Endpoint::Upload => "Upload failed",
            Endpoint::Ask => "Failed to get answer",
            Endpoint::Health => "Health check failed",
        }
    }
}

/// File contents ready to be sent as the `file` form part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerReply {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReply {
    pub status: String,
}

impl HealthReply {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Upload { file_name: String, path: PathBuf },
    Ask { question: String },
    CheckHealth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted(Result<UploadReply, ApiError>),
    AnswerCompleted(Result<AnswerReply, ApiError>),
    HealthCompleted(Result<HealthReply, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Any non-2xx status. 4xx and 5xx are treated alike.
    HttpStatus(u16),
    Timeout,
    Network,
    /// The local file could not be read before upload.
    Io,
    /// A 2xx response whose body is not the expected JSON.
    InvalidBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::InvalidBody => write!(f, "invalid response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ApiError {
    pub endpoint: Endpoint,
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind,
            message: message.into(),
        }
    }

    /// True for failures where the backend answered but not with success.
    pub fn is_server_error(&self) -> bool {
        matches!(self.kind, FailureKind::HttpStatus(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.endpoint.failure_label();
        match &self.kind {
            FailureKind::HttpStatus(code) => write!(f, "{label} (HTTP {code})"),
            FailureKind::Io => write!(f, "could not read file: {}", self.message),
            kind => write!(f, "{label}: {kind}: {}", self.message),
        }
    }
}
