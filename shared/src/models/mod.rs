//! Data models
//!
//! Shared between the HR client library and the admin front-end.
//! Records are owned by the HR backend; these are transient copies.

pub mod employee;
pub mod page;
pub mod stats;

// Re-exports
pub use employee::*;
pub use page::*;
pub use stats::*;
