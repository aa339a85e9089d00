mod config;
pub mod database;
mod memory;
mod snapshot;

pub use config::{Config, LoggingConfig, NotificationsConfig, TickerConfig, TimerDefaults};
pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use snapshot::SnapshotSlot;

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable key-value storage consumed by every persisted aggregate.
///
/// Values are opaque JSON snapshots keyed by a stable per-aggregate name.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `NEURAL_ARCHITECT_HOME` overrides everything. Otherwise
/// `~/.config/neural-architect[-dev]/` based on `NEURAL_ARCHITECT_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("NEURAL_ARCHITECT_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("NEURAL_ARCHITECT_ENV")
                .unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("neural-architect-dev")
            } else {
                base_dir.join("neural-architect")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
