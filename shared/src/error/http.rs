//! Mapping of backend HTTP statuses to error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Best-effort mapping of an HTTP status returned by the backend
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            s if s.is_success() => Self::Success,
            _ => Self::InternalError,
        }
    }
}
