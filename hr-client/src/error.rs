//! Client error types

use http::StatusCode;
use shared::{AppError, ErrorCategory, ErrorCode};
use thiserror::Error;

/// Client error type
///
/// `Validation` failures are raised before any request is sent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Pre-flight validation failed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(AppError),

    /// Transport failure (connect, timeout, body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error envelope
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: StatusCode,
        code: ErrorCode,
        message: String,
    },

    /// Response did not match the envelope format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No session in the application context
    #[error("Not logged in")]
    NotLoggedIn,

    /// The owning view was left; the result was dropped
    #[error("Request cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Build from a server error envelope
    pub fn from_api(status: StatusCode, err: AppError) -> Self {
        ClientError::Api {
            status,
            code: err.code,
            message: err.message,
        }
    }

    /// Server error code, if the server answered
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            ClientError::Validation(err) => Some(err.code),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Whether the session is no longer valid
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::NotLoggedIn)
            || matches!(self, ClientError::Api { code, .. } if code.category() == ErrorCategory::Auth)
    }

    /// Whether repeating the same call could succeed
    ///
    /// The client never retries on its own; callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            ClientError::Api { status, code, .. } => {
                *status == StatusCode::SERVICE_UNAVAILABLE
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || matches!(code, ErrorCode::NetworkError | ErrorCode::TimeoutError)
            }
            _ => false,
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Validation(err)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_expose_code_and_retryability() {
        let err = ClientError::from_api(
            StatusCode::CONFLICT,
            AppError::new(ErrorCode::PollAlreadyVoted),
        );
        assert_eq!(err.code(), Some(ErrorCode::PollAlreadyVoted));
        assert!(!err.is_retryable());
        assert!(!err.is_validation());

        let err = ClientError::from_api(
            StatusCode::SERVICE_UNAVAILABLE,
            AppError::new(ErrorCode::TimeoutError),
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn auth_codes_are_auth_failures() {
        let err = ClientError::from_api(StatusCode::UNAUTHORIZED, AppError::new(ErrorCode::TokenExpired));
        assert!(err.is_auth_failure());
        assert!(ClientError::NotLoggedIn.is_auth_failure());
        assert!(!ClientError::Cancelled.is_auth_failure());
    }
}
