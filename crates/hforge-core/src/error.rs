//! Resolution error types.

use thiserror::Error;

/// Errors that can occur while resolving a class reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The registry name after the marker is empty or has no `/`.
    #[error("invalid registry reference: {name:?} (expected `<owner>/<name>`)")]
    InvalidReference { name: String },

    /// Connection, request or body read failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The registry answered with a non-success HTTP status.
    #[error("registry returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The registry has no entry for this name.
    #[error("registry entry not found: {name}")]
    NotFound { name: String },

    /// The lookup did not finish within the configured deadline.
    #[error("lookup timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The response body exceeded the configured maximum.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The caller cancelled the resolution.
    #[error("resolution cancelled")]
    Cancelled,

    /// Registry configuration is unusable (bad URL, unreadable file, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ResolveError {
    /// Returns `true` if this error is transient and the lookup may be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the error was raised before any network access.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }
}
