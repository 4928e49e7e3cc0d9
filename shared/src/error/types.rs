//! Backend error body

use serde::{Deserialize, Serialize};

/// Error body returned by the HR backend
///
/// The backend is not consistent about which key carries the text, so
/// every known variant is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorBody {
    /// Server-provided text, `message` preferred over `error`
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Parse a raw response body, tolerating non-JSON bodies
    pub fn parse(raw: &str) -> Option<String> {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body.text().map(str::to_string),
            Err(_) => {
                let trimmed = raw.trim();
                // HTML error pages are not worth showing
                if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.starts_with('{') {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}
