//! Core library surface for the Bookshelf reading tracker.
//!
//! The collection lives as one JSON document in a key-value slot backed by
//! SQLite. `views` turns it into per-page view models and `ui` draws those in
//! the terminal.
pub mod config;
pub mod cover;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod route;
pub mod ui;
pub mod views;

/// Persistence entry points used by `main.rs`.
pub use db::{ensure_schema, BookStore, SqliteStorage};

pub use config::AppConfig;
pub use models::Book;
pub use route::Route;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
