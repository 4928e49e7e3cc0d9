//! GV-RH admin front-end
//!
//! Roster screen logic (listing, form, deletion, export) on top of
//! `hr-client`, with a clap CLI and a line-driven console as surfaces.

pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod employees;
pub mod export;
pub mod logger;
pub mod view;

pub use app::AppContext;
pub use config::{AppConfig, ConfigArgs};
pub use logger::init_logger;
