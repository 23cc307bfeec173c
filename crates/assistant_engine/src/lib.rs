//! Assistant engine: HTTP backend client and effect execution.
mod backend;
mod engine;
mod types;

pub use backend::{ApiSettings, Backend, ReqwestBackend, DEFAULT_API_BASE};
pub use engine::EngineHandle;
pub use types::{
    AnswerReply, ApiError, AskRequest, Endpoint, EngineCommand, EngineEvent, FailureKind,
    HealthReply, UploadPayload, UploadReply,
};
