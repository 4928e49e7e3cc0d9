//! Session management: persisted storage and the in-memory store

mod storage;
mod store;

pub use storage::{PersistedSession, SessionStorage};
pub use store::{Authenticator, Session, SessionEvent, SessionStore};
