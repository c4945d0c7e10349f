//! pcbook error types

use std::fmt;

/// pcbook error types
#[derive(Debug, thiserror::Error)]
pub enum PcbookError {
    // Caller faults
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    // Caller gave up
    #[error("request is canceled")]
    Canceled,

    #[error("deadline is exceeded")]
    DeadlineExceeded,

    // Server faults
    #[error("internal error: {0}")]
    Internal(String),

    /// Malformed or unreadable inbound stream message.
    #[error("stream error: {0}")]
    Unknown(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(any(feature = "server", feature = "client"))]
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Caller-visible error classification, one per RPC status code surfaced
/// by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Canceled,
    DeadlineExceeded,
    Internal,
    Unknown,
}

impl ErrorCode {
    /// Stable lowercase label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Canceled => "canceled",
            ErrorCode::DeadlineExceeded => "deadline_exceeded",
            ErrorCode::Internal => "internal",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PcbookError {
    /// Classify this error into the RPC error taxonomy.
    ///
    /// Local failures (I/O, serialization, configuration) have no caller
    /// fault attached and classify as [`ErrorCode::Internal`].
    pub fn code(&self) -> ErrorCode {
        match self {
            PcbookError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            PcbookError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            PcbookError::NotFound(_) => ErrorCode::NotFound,
            PcbookError::Canceled => ErrorCode::Canceled,
            PcbookError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            PcbookError::Unknown(_) => ErrorCode::Unknown,
            PcbookError::Internal(_)
            | PcbookError::Configuration(_)
            | PcbookError::Io(_)
            | PcbookError::Json(_) => ErrorCode::Internal,
            #[cfg(any(feature = "server", feature = "client"))]
            PcbookError::Decode(_) => ErrorCode::Internal,
        }
    }

    /// Whether the caller cancelled the call or ran out of time.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PcbookError::Canceled | PcbookError::DeadlineExceeded)
    }
}

/// Result type alias for pcbook operations
pub type Result<T> = std::result::Result<T, PcbookError>;
