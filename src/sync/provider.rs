//! # Sync Provider Contract
//!
//! The trait every task-service backend implements, plus the error type the
//! sync layer speaks. Providers only move reminders; which direction they
//! move and when is the engine's business.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Reminder;
use crate::sync::merge::merge_by_last_modified;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no sync provider configured")]
    NoProvider,
    #[error("sync is disabled")]
    Disabled,
    #[error("sync provider is not authenticated")]
    NotAuthenticated,
    #[error("sync provider error: {0}")]
    Provider(String),
}

/// A remote task service that can hold the reminder list.
///
/// Push and pull require authentication and fail with
/// [`SyncError::NotAuthenticated`] otherwise.
#[async_trait]
pub trait SyncProvider: Send + Sync {
    /// Human-readable service name for logs and settings UI.
    fn provider_name(&self) -> &str;

    fn is_authenticated(&self) -> bool;

    /// Run the provider's sign-in flow. Returns whether the provider ended
    /// up authenticated.
    async fn authenticate(&self) -> Result<bool, SyncError>;

    async fn sign_out(&self) -> Result<(), SyncError>;

    async fn push_reminders(&self, reminders: &[Reminder]) -> Result<(), SyncError>;

    async fn pull_reminders(&self) -> Result<Vec<Reminder>, SyncError>;

    /// One two-way pass: pull the remote set, merge by last writer, push the
    /// merged set back, and return it.
    async fn sync(&self, local: &[Reminder]) -> Result<Vec<Reminder>, SyncError> {
        let remote = self.pull_reminders().await?;
        let merged = merge_by_last_modified(local, &remote);
        self.push_reminders(&merged).await?;
        Ok(merged)
    }
}
