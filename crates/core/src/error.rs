//! Unified error types for userdeck.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Failure of a single fetch attempt.
///
/// Transport errors, non-success statuses and body decode errors all collapse
/// into this one message-carrying value; consumers cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchFailure {
    message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unified error types for userdeck.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a zero page size).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The watch channel behind a subscription closed.
    ///
    /// A live [`Subscription`](crate::Subscription) keeps its entry and the
    /// entry's sender alive, dropped cache handles included, so this only
    /// surfaces if that ownership invariant is broken.
    #[error("CACHE_CLOSED: {0}")]
    CacheClosed(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheClosed(key) => (-32021, format!("cache entry closed: {key}")),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("page_size must be positive".to_string());
        assert!(err.to_string().contains("INVALID_INPUT"));
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheClosed("https://example.com/users".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32021);
        assert!(mcp_err.message.contains("example.com"));
    }

    #[test]
    fn test_fetch_failure_message() {
        let failure = FetchFailure::new("status 503");
        assert_eq!(failure.message(), "status 503");
        assert_eq!(failure.to_string(), "status 503");
    }
}
