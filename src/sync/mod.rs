//! # Feature: Task-Service Sync
//!
//! Keeps the reminder list aligned with an external task service. A
//! provider (Microsoft To-Do or Google Tasks) moves reminders over the wire,
//! the engine decides when and in which direction, and the last-writer merge
//! reconciles the two sides. Sync never runs unless it is enabled and the
//! selected provider is authenticated.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial creation with two placeholder providers

pub mod engine;
pub mod google;
pub mod merge;
pub mod microsoft;
pub mod provider;

pub use engine::SyncEngine;
pub use google::GoogleTasksProvider;
pub use merge::merge_by_last_modified;
pub use microsoft::MicrosoftToDoProvider;
pub use provider::{SyncError, SyncProvider};
