use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNAUTHENTICATED_MESSAGE: &str = "You must be signed in to use the AI coach.";
pub const INVALID_MESSAGES_MESSAGE: &str = "messages must be an array of { role, content }.";
pub const API_KEY_MISSING_MESSAGE: &str = "OpenAI API key not configured.";
pub const INTERNAL_MESSAGE: &str = "AI service failed.";

/// Status codes of the callable protocol, as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorStatus {
    Unauthenticated,
    InvalidArgument,
    FailedPrecondition,
    Internal,
    DeadlineExceeded,
}

/// Caller-facing errors of the AI coach.
///
/// The `Display` output of every variant is the fixed message shown to the caller.
/// `Internal` keeps the underlying failure as its source so it can be logged server-side,
/// but never renders it.
#[derive(Error, Debug)]
pub enum CallableError {
    #[error("You must be signed in to use the AI coach.")]
    Unauthenticated,

    #[error("messages must be an array of {{ role, content }}.")]
    InvalidArgument,

    #[error("OpenAI API key not configured.")]
    FailedPrecondition,

    #[error("AI service failed.")]
    Internal(#[source] anyhow::Error),
}

impl CallableError {
    pub fn internal<E: Into<anyhow::Error>>(error: E) -> Self {
        CallableError::Internal(error.into())
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            CallableError::Unauthenticated => ErrorStatus::Unauthenticated,
            CallableError::InvalidArgument => ErrorStatus::InvalidArgument,
            CallableError::FailedPrecondition => ErrorStatus::FailedPrecondition,
            CallableError::Internal(_) => ErrorStatus::Internal,
        }
    }
}

pub type CallableResult<T> = Result<T, CallableError>;
