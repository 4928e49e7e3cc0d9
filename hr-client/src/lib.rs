//! HR Client - session and HTTP access to the HR backend
//!
//! - [`SessionStore`]: token, username and roles, persisted to disk
//! - [`ApiGateway`]: configured HTTP client with bearer injection and
//!   global 401 handling
//! - [`EmployeeRepository`]: typed employee calls

pub mod config;
pub mod error;
pub mod gateway;
pub mod repository;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{ApiGateway, Binary};
pub use repository::{Document, EmployeeRepository, HttpEmployeeRepository, ListQuery, Photo};
pub use session::{
    Authenticator, PersistedSession, Session, SessionEvent, SessionStorage, SessionStore,
};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse};
pub use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, Page};
