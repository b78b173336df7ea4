//! Persistence layer for per-user settings.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use memory::MemorySettings;
pub use traits::{SettingsStore, settings_keys};
