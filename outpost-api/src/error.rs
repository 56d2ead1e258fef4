//! Service client error types.

use thiserror::Error;

use crate::fallback::FallbackTopic;

/// Errors a remote call can end in before it is mapped to a fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service could not be reached (refused, reset, DNS).
    #[error("Service unreachable: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("Service request timed out: {0}")]
    Timeout(String),

    /// The service answered with a non-success status.
    #[error("Service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode service response: {0}")]
    Decode(String),

    /// Any other transport failure.
    #[error("Service request failed: {0}")]
    Request(String),

    /// The local save store failed.
    #[error("Local save store error: {0}")]
    Local(#[from] outpost_core::OutpostError),
}

impl ApiError {
    /// Which fallback dialogue line this failure maps to.
    #[must_use]
    pub fn fallback_topic(&self) -> FallbackTopic {
        match self {
            Self::Connection(_) | Self::Timeout(_) => FallbackTopic::ConnectionError,
            _ => FallbackTopic::Custom,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;
