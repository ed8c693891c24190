//! Durable key-value persistence.
//!
//! Aggregates are stored whole as JSON strings under string keys
//! (`user-progress`, `daily-challenge`). The [`Store`] contract is
//! last-write-wins with no transactions; writers serialize through the
//! core's single entry points, so whole-snapshot writes are never torn.

mod config;
pub mod database;
mod memory;

pub use config::{CaptureConfig, Config, NotificationsConfig, OptimizerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Store key for the persisted progress aggregate.
pub const USER_PROGRESS_KEY: &str = "user-progress";

/// Returns `~/.config/snapstreak[-dev]/` based on SNAPSTREAK_ENV.
///
/// Set SNAPSTREAK_ENV=dev to use a development data directory.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SNAPSTREAK_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("snapstreak-dev")
    } else {
        base_dir.join("snapstreak")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Durable key-value store keyed by string names.
///
/// Values are JSON-serialized aggregates; `get` falls back to the given
/// default when the key is absent, `set` overwrites (last-write-wins).
pub trait Store {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::CorruptValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_raw(key, &raw)
    }
}
