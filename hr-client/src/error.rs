//! Client error types

use http::StatusCode;
use shared::error::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failed or the transport broke mid-request
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success status other than 401
    #[error("Server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    /// 401 on an authenticated call; the session has been cleared
    #[error("Session expired")]
    SessionExpired,

    /// Login rejected (bad credentials, or the login call itself failed)
    #[error("Authentication failed")]
    Authentication,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

impl ClientError {
    /// Error code for logs and notifications
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Network(_) => ErrorCode::NetworkError,
            ClientError::Timeout => ErrorCode::TimeoutError,
            ClientError::Server { status, .. } => ErrorCode::from_status(*status),
            ClientError::SessionExpired => ErrorCode::SessionExpired,
            ClientError::Authentication => ErrorCode::InvalidCredentials,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InvalidFormat
            }
            ClientError::Storage(_) => ErrorCode::StorageError,
            ClientError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Text safe to show to the user
    ///
    /// Server-provided messages pass through; everything else collapses to
    /// the code's generic message so raw causes stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.code().message().to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_passes_through() {
        let err = ClientError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("duplicate employee number".into()),
        };
        assert_eq!(err.user_message(), "duplicate employee number");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[test]
    fn test_generic_messages_hide_cause() {
        let err = ClientError::Server {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), ErrorCode::NotFound.message());

        assert_eq!(
            ClientError::Authentication.user_message(),
            "Usuario o contraseña incorrectos"
        );
        assert_eq!(ClientError::Timeout.code(), ErrorCode::TimeoutError);
    }
}
