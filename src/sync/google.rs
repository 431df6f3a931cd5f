//! # Google Tasks Provider
//!
//! Placeholder backend for Google Tasks, mirroring the Microsoft one: the
//! contract and authentication state are in place, the Tasks API calls are
//! not.
//!
//! - **Version**: 0.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true (selected via the sync provider setting)

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::debug;

use crate::core::Reminder;
use crate::sync::provider::{SyncError, SyncProvider};

pub struct GoogleTasksProvider {
    authenticated: AtomicBool,
}

impl GoogleTasksProvider {
    pub fn new() -> Self {
        GoogleTasksProvider {
            authenticated: AtomicBool::new(false),
        }
    }

    fn require_auth(&self) -> Result<(), SyncError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SyncError::NotAuthenticated)
        }
    }
}

impl Default for GoogleTasksProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncProvider for GoogleTasksProvider {
    fn provider_name(&self) -> &str {
        "Google Tasks"
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    async fn authenticate(&self) -> Result<bool, SyncError> {
        // TODO: run the OAuth consent flow against the Tasks API scope.
        debug!("Google Tasks authentication is not implemented yet");
        Ok(false)
    }

    async fn sign_out(&self) -> Result<(), SyncError> {
        self.authenticated.store(false, Ordering::Release);
        Ok(())
    }

    async fn push_reminders(&self, _reminders: &[Reminder]) -> Result<(), SyncError> {
        self.require_auth()?;
        // TODO: upsert into the default task list.
        Ok(())
    }

    async fn pull_reminders(&self) -> Result<Vec<Reminder>, SyncError> {
        self.require_auth()?;
        // TODO: list tasks with due dates from the default task list.
        Ok(Vec::new())
    }
}
