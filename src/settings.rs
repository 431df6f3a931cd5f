//! # Feature: Settings Store
//!
//! Typed access to the host's key/value settings. The sill keeps its whole
//! state (reminder list, sync configuration, notification mode) under a
//! handful of well-known keys so the host can persist it however it likes.
//! Two backends ship here: a JSON document on disk for real hosts and an
//! in-memory map for tests.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Sync configuration key
//! - 1.1.0: Full-screen notification flag
//! - 1.0.0: Initial creation with reminder persistence

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use dashmap::DashMap;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::{Reminder, SyncConfig};

/// Settings key holding the persisted reminder list.
pub const REMINDERS_KEY: &str = "reminders";
/// Settings key holding the sync configuration.
pub const SYNC_KEY: &str = "sync";
/// Settings key selecting full-screen notifications over toasts.
pub const FULL_SCREEN_KEY: &str = "use_full_screen_notification";

/// Raw key/value storage supplied by the host.
///
/// Implementations must tolerate being called from any task; the store
/// serializes nothing on their behalf beyond handing over JSON values.
pub trait SettingsBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Cheap-to-clone typed view over a [`SettingsBackend`].
///
/// Reads never fail: a missing or malformed value logs a warning and falls
/// back to the documented default, so one corrupt key cannot take the whole
/// sill down.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        SettingsStore { backend }
    }

    /// Store backed by a JSON document at `path`.
    pub fn json_file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(SettingsStore::new(Arc::new(JsonFileSettings::open(path)?)))
    }

    /// Store backed by process memory. Nothing survives a restart.
    pub fn in_memory() -> Self {
        SettingsStore::new(Arc::new(MemorySettings::default()))
    }

    /// The persisted reminder list, or empty when absent.
    pub fn reminders(&self) -> Vec<Reminder> {
        self.get_or_default(REMINDERS_KEY)
    }

    pub fn set_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        self.set_value(REMINDERS_KEY, &reminders)
    }

    /// The persisted sync configuration, or defaults when absent.
    pub fn sync_config(&self) -> SyncConfig {
        self.get_or_default(SYNC_KEY)
    }

    pub fn set_sync_config(&self, config: &SyncConfig) -> Result<()> {
        self.set_value(SYNC_KEY, config)
    }

    /// Whether expiry shows full-screen overlays instead of toasts.
    /// Defaults to true.
    pub fn use_full_screen_notification(&self) -> bool {
        match self.backend.get(FULL_SCREEN_KEY) {
            Some(value) => match serde_json::from_value(value) {
                Ok(flag) => flag,
                Err(e) => {
                    warn!(
                        "Malformed '{}' setting, using default: {}",
                        FULL_SCREEN_KEY, e
                    );
                    true
                }
            },
            None => true,
        }
    }

    pub fn set_use_full_screen_notification(&self, enabled: bool) -> Result<()> {
        self.set_value(FULL_SCREEN_KEY, &enabled)
    }

    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.backend.get(key) {
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Malformed '{}' setting, using default: {}", key, e);
                    T::default()
                }
            },
            None => T::default(),
        }
    }

    fn set_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("failed to encode '{}' setting", key))?;
        self.backend.set(key, value)
    }
}

/// Settings persisted as one pretty-printed JSON object on disk.
///
/// The whole document is rewritten on every set. A missing file means a
/// fresh install; an unreadable document is logged and replaced on the next
/// write rather than blocking startup.
pub struct JsonFileSettings {
    path: PathBuf,
    document: Mutex<Map<String, Value>>,
}

impl JsonFileSettings {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "Settings file {} is not valid JSON, starting empty: {}",
                        path.display(),
                        e
                    );
                    Map::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read settings file {}", path.display())
                })
            }
        };
        Ok(JsonFileSettings {
            path,
            document: Mutex::new(document),
        })
    }

    fn write_out(&self, document: &Map<String, Value>) -> Result<()> {
        let text = serde_json::to_string_pretty(document)
            .context("failed to encode settings document")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write settings file {}", self.path.display()))
    }
}

impl SettingsBackend for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        document.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        document.insert(key.to_string(), value);
        self.write_out(&document)
    }
}

/// Settings held in a concurrent map. Used by tests and embedded hosts that
/// persist elsewhere.
#[derive(Default)]
pub struct MemorySettings {
    values: DashMap<String, Value>,
}

impl SettingsBackend for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
