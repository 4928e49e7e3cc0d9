//! Cross-screen plumbing: notifications, route guard, navigation

pub mod guard;
pub mod navigator;
pub mod notification;

pub use guard::{Access, EDITOR_ROLES};
pub use navigator::{Navigator, Screen};
pub use notification::{Notification, Notifier, Severity};
