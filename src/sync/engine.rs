//! # Sync Engine
//!
//! Owns the selected sync provider and runs sync passes against it. The
//! engine enforces the gate order (a provider must be selected, then
//! authenticated, then sync must be enabled), applies the configured
//! direction, and records the last successful pass in settings. It never
//! touches the reminder list itself; callers hand in a snapshot and adopt
//! the merged result.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true (via the sync enabled setting)
//!
//! ## Changelog
//! - 1.0.0: Initial creation with provider selection and direction handling

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use log::{info, warn};

use crate::core::{Reminder, SyncDirection, SyncProviderType};
use crate::settings::SettingsStore;
use crate::sync::google::GoogleTasksProvider;
use crate::sync::merge::merge_by_last_modified;
use crate::sync::microsoft::MicrosoftToDoProvider;
use crate::sync::provider::{SyncError, SyncProvider};

pub struct SyncEngine {
    settings: SettingsStore,
    current: Mutex<Option<Arc<dyn SyncProvider>>>,
}

impl SyncEngine {
    pub fn new(settings: SettingsStore) -> Self {
        SyncEngine {
            settings,
            current: Mutex::new(None),
        }
    }

    /// Restore the provider selected in a previous session, if any.
    pub fn initialize(&self) {
        let configured = self.settings.sync_config().provider;
        if configured != SyncProviderType::None {
            self.set_provider(configured);
        }
    }

    /// Select the provider backing sync, replacing any current one, and
    /// persist the selection. `SyncProviderType::None` clears the current
    /// provider and reports false without persisting anything.
    pub fn set_provider(&self, kind: SyncProviderType) -> bool {
        let provider: Option<Arc<dyn SyncProvider>> = match kind {
            SyncProviderType::None => None,
            SyncProviderType::MicrosoftToDo => Some(Arc::new(MicrosoftToDoProvider::new())),
            SyncProviderType::GoogleTasks => Some(Arc::new(GoogleTasksProvider::new())),
        };
        let name = provider.as_ref().map(|p| p.provider_name().to_string());

        *self.lock_current() = provider;

        match name {
            Some(name) => {
                let mut config = self.settings.sync_config();
                config.provider = kind;
                if let Err(e) = self.settings.set_sync_config(&config) {
                    warn!("Failed to persist sync provider selection: {}", e);
                }
                info!("Sync provider set to {}", name);
                true
            }
            None => false,
        }
    }

    /// Install a specific provider instance, for hosts wiring their own
    /// backend. The persisted provider type is left alone.
    pub fn set_provider_instance(&self, provider: Arc<dyn SyncProvider>) {
        *self.lock_current() = Some(provider);
    }

    pub fn current_provider(&self) -> Option<Arc<dyn SyncProvider>> {
        self.lock_current().clone()
    }

    /// Run the selected provider's sign-in flow. False when no provider is
    /// selected or the flow fails.
    pub async fn authenticate(&self) -> bool {
        let provider = match self.current_provider() {
            Some(provider) => provider,
            None => return false,
        };
        match provider.authenticate().await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                warn!("Sync provider authentication failed: {}", e);
                false
            }
        }
    }

    /// Sign out of the current provider, clear it, and persist the cleared
    /// selection. Does nothing when no provider is selected.
    pub async fn sign_out(&self) {
        let provider = match self.lock_current().take() {
            Some(provider) => provider,
            None => return,
        };
        if let Err(e) = provider.sign_out().await {
            warn!("Sync provider sign-out failed: {}", e);
        }
        let mut config = self.settings.sync_config();
        config.provider = SyncProviderType::None;
        if let Err(e) = self.settings.set_sync_config(&config) {
            warn!("Failed to persist sync provider selection: {}", e);
        }
        info!("Signed out of {}", provider.provider_name());
    }

    /// Whether an automatic pass would run right now: sync enabled and an
    /// authenticated provider selected.
    pub fn is_ready(&self) -> bool {
        if !self.settings.sync_config().enabled {
            return false;
        }
        self.current_provider()
            .map(|provider| provider.is_authenticated())
            .unwrap_or(false)
    }

    /// Run one sync pass over a snapshot of the local list.
    ///
    /// Returns the merged list the caller should adopt, or `None` when the
    /// pass leaves the local list alone (push-only). The last-sync timestamp
    /// is recorded only after a successful pass.
    pub async fn sync_reminders(
        &self,
        local: &[Reminder],
    ) -> Result<Option<Vec<Reminder>>, SyncError> {
        let provider = self.current_provider().ok_or(SyncError::NoProvider)?;
        if !provider.is_authenticated() {
            return Err(SyncError::NotAuthenticated);
        }
        let config = self.settings.sync_config();
        if !config.enabled {
            return Err(SyncError::Disabled);
        }

        let merged = match config.direction {
            SyncDirection::TwoWay => Some(provider.sync(local).await?),
            SyncDirection::PushOnly => {
                provider.push_reminders(local).await?;
                None
            }
            SyncDirection::PullOnly => {
                let remote = provider.pull_reminders().await?;
                Some(merge_by_last_modified(local, &remote))
            }
        };

        let mut config = self.settings.sync_config();
        config.last_sync_time = Some(Utc::now());
        if let Err(e) = self.settings.set_sync_config(&config) {
            warn!("Failed to persist last sync time: {}", e);
        }
        info!("Sync pass completed via {}", provider.provider_name());

        Ok(merged)
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Arc<dyn SyncProvider>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
