//! Error codes shared by the GV-RH crates
//!
//! - [`ErrorCode`]: numeric codes with default user-facing messages
//! - [`ErrorBody`]: error body as sent by the HR backend
//!
//! ```
//! use shared::error::{ErrorBody, ErrorCode};
//!
//! assert_eq!(ErrorCode::ExportEmpty.code(), 8101);
//! let raw = r#"{"message":"duplicate employee number","status":500}"#;
//! assert_eq!(ErrorBody::parse(raw).as_deref(), Some("duplicate employee number"));
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::ErrorBody;
