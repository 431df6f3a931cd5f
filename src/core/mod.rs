//! # Core Module
//!
//! Core domain types and configuration for the reminder sill.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add sync configuration types
//! - 1.0.0: Initial creation with reminder entity

pub mod config;
pub mod reminder;

// Re-export commonly used items
pub use config::{SyncConfig, SyncDirection, SyncProviderType};
pub use reminder::Reminder;
