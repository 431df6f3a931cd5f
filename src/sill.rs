//! # Feature: Reminder Sill
//!
//! The facade a host embeds: activation starts the reminder service and
//! restores the persisted sync provider, deactivation stops the loop and
//! sweeps any notification still on screen. The host supplies settings
//! storage and notification backends; everything else lives behind the
//! handle this module returns.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with activate/deactivate lifecycle

use std::sync::Arc;

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::notify::{DisplayHost, Notifier, ToastHost};
use crate::service::{ReminderService, SillHandle};
use crate::settings::SettingsStore;
use crate::sync::SyncEngine;

/// Name the host shows for this sill.
pub const DISPLAY_NAME: &str = "Short Term Reminders";

pub struct ReminderSill {
    settings: SettingsStore,
    displays: Arc<dyn DisplayHost>,
    toasts: Arc<dyn ToastHost>,
    sync: Arc<SyncEngine>,
    running: Option<(SillHandle, JoinHandle<()>)>,
}

impl ReminderSill {
    pub fn new(
        settings: SettingsStore,
        displays: Arc<dyn DisplayHost>,
        toasts: Arc<dyn ToastHost>,
    ) -> Self {
        let sync = Arc::new(SyncEngine::new(settings.clone()));
        ReminderSill {
            settings,
            displays,
            toasts,
            sync,
            running: None,
        }
    }

    /// Start the reminder service. Idempotent: activating an active sill
    /// returns the running handle.
    pub fn on_activated(&mut self) -> SillHandle {
        if let Some((handle, _)) = &self.running {
            return handle.clone();
        }
        info!("{} activated", DISPLAY_NAME);

        self.sync.initialize();
        let notifier = Arc::new(Notifier::new(
            Arc::clone(&self.displays),
            Arc::clone(&self.toasts),
            self.settings.clone(),
        ));
        let (handle, task) =
            ReminderService::spawn(self.settings.clone(), notifier, Arc::clone(&self.sync));
        self.running = Some((handle.clone(), task));
        handle
    }

    /// Stop the service loop and wait for it to finish. Anything still on
    /// screen is closed on the way out. Does nothing when not active.
    pub async fn on_deactivated(&mut self) {
        let (handle, task) = match self.running.take() {
            Some(running) => running,
            None => return,
        };
        handle.shutdown().await;
        if let Err(e) = task.await {
            warn!("Reminder service task ended abnormally: {}", e);
        }
        info!("{} deactivated", DISPLAY_NAME);
    }

    /// Handle to the running service, when active.
    pub fn handle(&self) -> Option<SillHandle> {
        self.running.as_ref().map(|(handle, _)| handle.clone())
    }

    /// The sync engine, for provider selection and sign-in flows.
    pub fn sync(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.sync)
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }
}
