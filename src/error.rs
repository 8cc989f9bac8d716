//! Error types for the dashboard sources

use thiserror::Error;

/// Errors that can occur while fetching or reshaping a source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Quote page answered with anything other than 200 OK
    #[error("blocked")]
    Blocked {
        /// HTTP status code
        status: u16,
    },

    /// Upstream returned a non-success status
    #[error("HTTP error: {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Client timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// HTTP request failed (DNS, connect, body read, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    Parse(String),

    /// A row carried a timestamp that could not be parsed
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    /// Invalid or missing configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_displays_bare_word() {
        let err = FetchError::Blocked { status: 403 };
        assert_eq!(err.to_string(), "blocked");
    }

    #[test]
    fn test_status_includes_code() {
        let err = FetchError::Status { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");
    }
}
