//! # Sync Configuration
//!
//! Serde-backed configuration for the task-service sync feature: which
//! provider is selected, which direction changes flow, and when the last
//! successful sync ran.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true (sync is off until `enabled` is set)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which remote task service backs the sync feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncProviderType {
    #[default]
    None,
    MicrosoftToDo,
    GoogleTasks,
}

/// Which way reminder changes flow during a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncDirection {
    /// Pull, merge by last writer, push the merged set back.
    #[default]
    TwoWay,
    /// Push the local set; remote changes are ignored.
    PushOnly,
    /// Pull and merge locally; nothing is written to the remote.
    PullOnly,
}

/// Persisted sync settings. Every field defaults so partially written or
/// older settings documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub provider: SyncProviderType,
    pub direction: SyncDirection,
    pub last_sync_time: Option<DateTime<Utc>>,
}
