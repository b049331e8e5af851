//! TabKeeper Storage Layer
//!
//! Scoped JSON key/value persistence. Two scopes share one SQLite table:
//! `Local` (device-only, holds saved contexts) and `Sync` (small user settings).

mod database;
mod error;
mod migrations;
mod settings;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use settings::Settings;
pub use store::{KeyValueStore, Scope};

pub type Result<T> = std::result::Result<T, StorageError>;
