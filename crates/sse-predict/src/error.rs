//! Failures reported by a prediction backend.

use thiserror::Error;

/// Errors raised while obtaining a prediction.
///
/// None of these are fatal to the daemon. Handlers log the
/// [`reason`](Self::reason) and degrade to their sentinel output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No username or API key was configured.
    #[error("prediction service credentials are not configured")]
    MissingCredentials,

    /// The HTTP client could not be constructed.
    #[error("failed to initialise prediction client: {message}")]
    Client {
        /// Client builder diagnostic.
        message: String,
    },

    /// The service could not be reached or the request timed out.
    #[error("prediction service at '{url}' is unreachable: {message}")]
    Unreachable {
        /// Endpoint that was contacted.
        url: String,
        /// Transport diagnostic.
        message: String,
    },

    /// The service refused the credentials.
    #[error("prediction service rejected the credentials (HTTP {status})")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
    },

    /// The service answered with a non-success status.
    #[error("prediction service returned HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        message: String,
    },

    /// The response body was not a prediction.
    #[error("prediction service returned a malformed response: {message}")]
    MalformedResponse {
        /// Decoder diagnostic.
        message: String,
    },
}

impl BackendError {
    /// Short, stable label for structured logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::Client { .. } => "client",
            Self::Unreachable { .. } => "unreachable",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Rejected { .. } => "rejected",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }

    /// Returns `true` when retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::MissingCredentials
            | Self::Client { .. }
            | Self::Unauthorized { .. }
            | Self::MalformedResponse { .. } => false,
        }
    }
}
