mod config;
pub mod database;

pub use config::{BreathingConfig, Config, DistractionConfig, NotificationsConfig, ProfileConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable key-value storage backing the application state.
///
/// Values are JSON documents. Implementations must make `set` visible to
/// a later `get` on the same store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Returns `~/.config/quitbuddy[-dev]/` based on QUITBUDDY_ENV.
///
/// Set QUITBUDDY_ENV=dev to use development data directory.
/// QUITBUDDY_DATA_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("QUITBUDDY_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("QUITBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("quitbuddy-dev")
            } else {
                base_dir.join("quitbuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
