//! Error types for API operations.
//!
//! Every public operation in this crate surfaces failures through [`ApiError`].
//! The crate never retries on its own; [`ApiError::category`] classifies
//! variants so callers can layer their own retry policy on top.

use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the Travelpayouts API.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-200 HTTP status. The message is pulled from the response body's
    /// `message` field when the body is JSON, `unknown` otherwise.
    #[error("{status}:{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Best-effort error message from the response body
        message: String,
    },

    /// Transport-level request failure (connection, TLS, timeout).
    #[error("Request error: {0}")]
    Request(String),

    /// Response body could not be decoded as JSON.
    #[error("Unable to decode json response: {0}")]
    Decode(String),

    /// Caller-supplied arguments violate a precondition. Raised before any
    /// network call is made.
    #[error("{0}")]
    Validation(String),

    /// A mandatory field is absent from a response record.
    #[error("Missing mandatory field: {0}")]
    MissingField(&'static str),

    /// Configuration error (bad token, malformed config file).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse error classification for callers that retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Likely to succeed on retry (server errors, transport hiccups)
    Transient,
    /// Will not succeed on retry without changing the request
    Permanent,
    /// Rate limited; back off before retrying
    ResourceExhausted,
    /// Requires a configuration change
    Configuration,
}

impl ApiError {
    /// Create a status error from an HTTP status code and message.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The HTTP status code, when this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify this error for retry decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Status { status, .. } => match status {
                429 => ErrorCategory::ResourceExhausted,
                s if *s >= 500 => ErrorCategory::Transient,
                401 | 403 => ErrorCategory::Configuration,
                _ => ErrorCategory::Permanent,
            },
            Self::Request(_) => ErrorCategory::Transient,
            Self::Decode(_) => ErrorCategory::Permanent,
            Self::Validation(_) => ErrorCategory::Permanent,
            Self::MissingField(_) => ErrorCategory::Permanent,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether a retry of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Transient | ErrorCategory::ResourceExhausted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::status(404, "Not Found");
        assert_eq!(err.to_string(), "404:Not Found");
    }

    #[test]
    fn test_unknown_message_display() {
        let err = ApiError::status(500, "unknown");
        assert_eq!(err.to_string(), "500:unknown");
    }

    #[test]
    fn test_validation_display_is_bare() {
        let err = ApiError::validation("no more then 3 children allowed");
        assert_eq!(err.to_string(), "no more then 3 children allowed");
    }

    #[test]
    fn test_decode_display() {
        let err = ApiError::Decode("not json".to_string());
        assert_eq!(err.to_string(), "Unable to decode json response: not json");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ApiError::status(503, "unknown").category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            ApiError::status(404, "Not Found").category(),
            ErrorCategory::Permanent
        );
        assert_eq!(
            ApiError::status(429, "unknown").category(),
            ErrorCategory::ResourceExhausted
        );
        assert_eq!(
            ApiError::status(401, "unknown").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ApiError::Request("timeout".to_string()).category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            ApiError::MissingField("value").category(),
            ErrorCategory::Permanent
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(ApiError::status(502, "unknown").is_transient());
        assert!(ApiError::status(429, "unknown").is_transient());
        assert!(!ApiError::status(400, "bad request").is_transient());
        assert!(!ApiError::MissingField("origin").is_transient());
    }

    #[test]
    fn test_status_code_accessor() {
        assert_eq!(ApiError::status(404, "x").status_code(), Some(404));
        assert_eq!(ApiError::Request("x".to_string()).status_code(), None);
    }
}
