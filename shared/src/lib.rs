//! Shared types for GV-RH
//!
//! Wire types exchanged with the HR backend, the error code system and
//! the employee domain models used by `hr-client` and `hr-admin`.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use models::{Employee, EmployeeCreate, EmployeeStats, EmployeeUpdate, HrAttributes, Page};
