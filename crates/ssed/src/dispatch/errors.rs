//! Error types for execution call failures.
//!
//! Every variant is scoped to one call. None of them stop the server; each
//! converts to the gRPC status returned to the host.

use thiserror::Error;
use tonic::{Code, Status};

use crate::codec::CodecError;

/// Errors surfaced while dispatching or running an execution call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The function request header was missing or unreadable.
    #[error("invalid function request header: {message}")]
    Decode {
        /// What was wrong with the header.
        message: String,
    },

    /// No handler is registered for the requested id.
    #[error("unknown function id {id}")]
    UnknownFunction {
        /// Requested identifier.
        id: u32,
    },

    /// Rows could not be decoded or the inbound stream failed.
    #[error("row stream error: {0}")]
    Codec(#[source] CodecError),

    /// The caller abandoned the call.
    #[error("call cancelled by the caller")]
    Cancelled,

    /// The handler failed unexpectedly.
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic for the log; not sent verbatim to the host.
        message: String,
    },
}

impl CallError {
    /// Creates a header decoding error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an unknown function error.
    #[must_use]
    pub const fn unknown_function(id: u32) -> Self {
        Self::UnknownFunction { id }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// gRPC status code reported for this error.
    #[must_use]
    pub fn code(&self) -> Code {
        match self {
            Self::Decode { .. } => Code::InvalidArgument,
            Self::UnknownFunction { .. } => Code::NotFound,
            Self::Codec(CodecError::Cell { .. }) => Code::InvalidArgument,
            Self::Codec(CodecError::Transport { source }) => source.code(),
            Self::Codec(CodecError::Cancelled) | Self::Cancelled => Code::Cancelled,
            Self::Internal { .. } => Code::Internal,
        }
    }
}

impl From<CodecError> for CallError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Cancelled => Self::Cancelled,
            other => Self::Codec(other),
        }
    }
}

impl From<CallError> for Status {
    fn from(error: CallError) -> Self {
        let code = error.code();
        let message = match &error {
            CallError::Internal { .. } => String::from("function execution failed"),
            other => other.to_string(),
        };
        Self::new(code, message)
    }
}
