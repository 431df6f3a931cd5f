//! # Microsoft To-Do Provider
//!
//! Placeholder backend for Microsoft To-Do. Carries the provider contract
//! and its authentication state; the Graph API calls are not wired up yet,
//! so sign-in reports failure and transfers refuse to run.
//!
//! - **Version**: 0.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true (selected via the sync provider setting)

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::debug;

use crate::core::Reminder;
use crate::sync::provider::{SyncError, SyncProvider};

pub struct MicrosoftToDoProvider {
    authenticated: AtomicBool,
}

impl MicrosoftToDoProvider {
    pub fn new() -> Self {
        MicrosoftToDoProvider {
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

impl Default for MicrosoftToDoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncProvider for MicrosoftToDoProvider {
    fn provider_name(&self) -> &str {
        "Microsoft To-Do"
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    async fn authenticate(&self) -> Result<bool, SyncError> {
        // TODO: run the MSAL device-code flow and store the token before
        // reporting success here.
        debug!("Microsoft To-Do authentication is not implemented yet");
        Ok(false)
    }

    async fn sign_out(&self) -> Result<(), SyncError> {
        self.authenticated.store(false, Ordering::Release);
        Ok(())
    }

    async fn push_reminders(&self, _reminders: &[Reminder]) -> Result<(), SyncError> {
        self.require_auth()?;
        // TODO: map reminders onto Graph todoTask resources.
        Ok(())
    }

    async fn pull_reminders(&self) -> Result<Vec<Reminder>, SyncError> {
        self.require_auth()?;
        // TODO: page through the Graph todoTask list.
        Ok(Vec::new())
    }
}
