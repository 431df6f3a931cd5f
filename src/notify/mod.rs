//! # Feature: Expiry Notifications
//!
//! Turns an expired reminder into something the user actually sees. Two
//! modes, selected by the `use_full_screen_notification` setting: a system
//! toast carrying the reminder id as its activation argument, or full-screen
//! surfaces fanned out to every display at once. With full-screen surfaces
//! the first display the user answers wins and every other surface is closed
//! with no further effect; only the first surface plays audio.
//!
//! - **Version**: 1.2.1
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.1: Registry keyed per session so overlapping sessions for one
//!   reminder sweep independently
//! - 1.2.0: Session registry so shutdown closes everything still on screen
//! - 1.1.0: Multi-display fan-out with first-answer-wins
//! - 1.0.0: Initial creation with toast and single overlay

pub mod surface;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use dashmap::DashMap;
use log::warn;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::core::Reminder;
use crate::settings::SettingsStore;

pub use surface::{
    DisplayBounds, DisplayHost, NotificationSurface, SurfaceOutcome, SurfaceRequest, ToastHost,
    ToastRequest, DEFAULT_SNOOZE_MINUTES,
};

/// How one reminder's notification ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The user dismissed the reminder.
    Dismissed,
    /// The user snoozed the reminder for the given duration.
    Snoozed(Duration),
    /// Every surface closed without a decision.
    Closed,
    /// A toast was posted; any decision arrives later via toast activation.
    Delivered,
}

impl From<SurfaceOutcome> for NotifyOutcome {
    fn from(outcome: SurfaceOutcome) -> Self {
        match outcome {
            SurfaceOutcome::Dismissed => NotifyOutcome::Dismissed,
            SurfaceOutcome::Snoozed(duration) => NotifyOutcome::Snoozed(duration),
            SurfaceOutcome::Closed => NotifyOutcome::Closed,
        }
    }
}

/// Expiry notification dispatcher.
///
/// One `notify` call per expiry; calls may overlap, including for the same
/// reminder (a snoozed reminder can expire again while an earlier overlay is
/// still up). Surfaces currently on screen are tracked per session so
/// `close_all` can sweep every one of them at shutdown.
pub struct Notifier {
    displays: Arc<dyn DisplayHost>,
    toasts: Arc<dyn ToastHost>,
    settings: SettingsStore,
    // Keyed by a fresh session id per notify call, not by reminder id, so
    // overlapping sessions for one reminder never evict each other.
    active: DashMap<Uuid, Vec<Arc<dyn NotificationSurface>>>,
}

impl Notifier {
    pub fn new(
        displays: Arc<dyn DisplayHost>,
        toasts: Arc<dyn ToastHost>,
        settings: SettingsStore,
    ) -> Self {
        Notifier {
            displays,
            toasts,
            settings,
            active: DashMap::new(),
        }
    }

    /// Notify the user that `reminder` is due, waiting for the outcome.
    ///
    /// The mode setting is read per call, so flipping it applies to the next
    /// expiry without a restart.
    pub async fn notify(&self, reminder: &Reminder) -> Result<NotifyOutcome> {
        if self.settings.use_full_screen_notification() {
            self.notify_full_screen(reminder).await
        } else {
            self.notify_toast(reminder).await
        }
    }

    /// Close every surface still on screen. Pending `notify` calls resolve
    /// with [`NotifyOutcome::Closed`].
    pub fn close_all(&self) {
        for entry in self.active.iter() {
            for surface in entry.value() {
                surface.close();
            }
        }
    }

    async fn notify_toast(&self, reminder: &Reminder) -> Result<NotifyOutcome> {
        let request = ToastRequest {
            argument: reminder.id.to_string(),
            title: reminder.title.clone(),
        };
        self.toasts
            .show(request)
            .await
            .context("failed to post reminder toast")?;
        Ok(NotifyOutcome::Delivered)
    }

    async fn notify_full_screen(&self, reminder: &Reminder) -> Result<NotifyOutcome> {
        let displays = self.displays.displays();

        let mut requests = Vec::with_capacity(displays.len().max(1));
        if displays.is_empty() {
            // No display information; let the host place a single surface.
            requests.push(SurfaceRequest {
                reminder_id: reminder.id,
                title: reminder.title.clone(),
                bounds: None,
                play_audio: true,
            });
        } else {
            for (index, bounds) in displays.into_iter().enumerate() {
                requests.push(SurfaceRequest {
                    reminder_id: reminder.id,
                    title: reminder.title.clone(),
                    bounds: Some(bounds),
                    play_audio: index == 0,
                });
            }
        }

        let mut surfaces: Vec<Arc<dyn NotificationSurface>> = Vec::with_capacity(requests.len());
        for request in requests {
            match self.displays.show(request).await {
                Ok(surface) => surfaces.push(surface),
                Err(e) => {
                    // Partial fan-out must not linger on other displays.
                    for surface in &surfaces {
                        surface.close();
                    }
                    return Err(e).context("failed to open a reminder surface");
                }
            }
        }

        let session = Uuid::new_v4();
        self.active.insert(session, surfaces.clone());
        let outcome = race_surfaces(surfaces).await;
        self.active.remove(&session);

        Ok(outcome.into())
    }
}

/// Wait for the first surface to resolve, then close the rest and drain
/// their tasks so nothing stays on screen.
async fn race_surfaces(surfaces: Vec<Arc<dyn NotificationSurface>>) -> SurfaceOutcome {
    let mut set = JoinSet::new();
    for (index, surface) in surfaces.iter().enumerate() {
        let surface = Arc::clone(surface);
        set.spawn(async move { (index, surface.outcome().await) });
    }

    let (winner, outcome) = loop {
        match set.join_next().await {
            Some(Ok(result)) => break result,
            Some(Err(e)) => {
                warn!("Reminder surface task failed: {}", e);
            }
            None => return SurfaceOutcome::Closed,
        }
    };

    for (index, surface) in surfaces.iter().enumerate() {
        if index != winner {
            surface.close();
        }
    }
    while let Some(result) = set.join_next().await {
        if let Err(e) = result {
            warn!("Reminder surface task failed: {}", e);
        }
    }

    outcome
}
