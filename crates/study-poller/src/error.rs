//! Error types for the poller.
//!
//! Fetch failures are absorbed at the cycle boundary and turned into a
//! notification plus an empty listing, so nothing here ever ends the loop.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single listings fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure, or a body that is not `{ "results": [...] }`
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any response other than 200 OK, typically an expired bearer token
    #[error("API error: {} {reason}", .status.as_u16())]
    Api { status: StatusCode, reason: String },
}

impl FetchError {
    pub fn api(status: StatusCode) -> Self {
        FetchError::Api {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

/// Failure while carrying out a planned side effect
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Desktop notification failed: {0}")]
    Notification(String),

    #[error("Failed to open browser: {0}")]
    Browser(#[source] std::io::Error),

    #[error("Failed to append to {path}: {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for fetches
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_canonical_reason() {
        match FetchError::api(StatusCode::UNAUTHORIZED) {
            FetchError::Api { status, reason } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(reason, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_display() {
        let err = FetchError::api(StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "API error: 403 Forbidden");
    }
}
