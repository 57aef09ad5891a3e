//! Error handling primitives shared across the service.
//!
//! Every failure carries a [`PredictCode`] so the HTTP layer can pick a status
//! without looking at message text.

use thiserror::Error;

/// Stable error codes, also emitted as the `code` field of request log events.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PredictCode {
    /// Success code used as a sentinel in logs.
    Ok = 0,
    /// Input failed validation.
    InvalidInput = 1,
    /// A model artefact was absent or malformed.
    ModelMissing = 2,
    /// Unexpected model output and other server-side failures.
    Internal = 3,
}

impl PredictCode {
    /// Whether the caller caused the failure.
    pub fn is_client(&self) -> bool {
        matches!(self, PredictCode::InvalidInput)
    }
}

/// Canonical error type for the service.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{code:?}: {msg}")]
pub struct PredictError {
    /// Machine parsable error code.
    pub code: PredictCode,
    /// Developer facing message. Only validation messages reach callers.
    pub msg: String,
}

/// Result alias used throughout the crate.
pub type PredictResult<T> = Result<T, PredictError>;

impl PredictError {
    /// Create a new error with the provided code and message.
    pub fn new(code: PredictCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    /// Validation helper.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(PredictCode::InvalidInput, msg)
    }

    /// Model missing helper.
    pub fn model_missing(msg: impl Into<String>) -> Self {
        Self::new(PredictCode::ModelMissing, msg)
    }

    /// Internal error helper.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(PredictCode::Internal, msg)
    }

    /// IO error helper, reported against the artefact that failed to load.
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::model_missing(format!("{}: {err}", path.display()))
    }

    /// Message that is safe to hand back to the caller.
    pub fn client_message(&self) -> &str {
        if self.code.is_client() {
            &self.msg
        } else {
            "internal error"
        }
    }
}
