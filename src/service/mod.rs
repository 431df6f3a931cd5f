//! # Feature: Reminder Service
//!
//! The single owner of live reminder state. Every mutation flows through one
//! command channel into one task, so the store, the countdown scheduler, and
//! persistence can never race; ticks, expiries, and list changes flow out on
//! a broadcast channel. The loop advances countdowns once a second, fans out
//! notifications when deadlines fire, folds notification outcomes and sync
//! results back in, and kicks off an automatic sync pass every five minutes
//! when sync is ready.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Automatic sync passes and sync result adoption
//! - 1.2.0: Toast activation entry point
//! - 1.1.0: Notification outcome handling (dismiss, snooze)
//! - 1.0.0: Initial creation with command loop and tick broadcast

pub mod events;
pub mod scheduler;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use log::{debug, error, info, warn};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::core::Reminder;
use crate::notify::{Notifier, NotifyOutcome};
use crate::settings::SettingsStore;
use crate::store::ReminderStore;
use crate::sync::SyncEngine;

pub use events::{ReminderView, SillEvent, SillViewItem};
pub use scheduler::{CountdownScheduler, TickOutcome, TickUpdate};

/// Broadcast buffer for tick and list events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
/// Command queue depth; senders wait briefly when the loop is saturated.
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;
/// How often countdowns advance.
pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);
/// Ticks between automatic sync passes (five minutes).
pub const AUTO_SYNC_TICKS: u64 = 300;

enum Command {
    Add {
        title: String,
        duration: Duration,
        reply: oneshot::Sender<Result<Reminder>>,
    },
    Delete {
        id: Uuid,
    },
    Snooze {
        id: Uuid,
        duration: Duration,
    },
    ViewItems {
        reply: oneshot::Sender<Vec<SillViewItem>>,
    },
    ToastActivated {
        argument: String,
    },
    NotifyFinished {
        id: Uuid,
        outcome: NotifyOutcome,
    },
    SyncNow {
        reply: Option<oneshot::Sender<bool>>,
    },
    SyncFinished {
        merged: Option<Vec<Reminder>>,
    },
    Shutdown,
}

/// Cheap-to-clone handle to the running reminder service.
#[derive(Clone)]
pub struct SillHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SillEvent>,
}

impl SillHandle {
    /// Add a reminder due `duration` from now. The title is trimmed and must
    /// not be blank; the duration must be positive.
    pub async fn add_reminder(
        &self,
        title: impl Into<String>,
        duration: Duration,
    ) -> Result<Reminder> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Add {
                title: title.into(),
                duration,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("reminder service dropped the request"))?
    }

    /// Delete a reminder. Unknown ids are ignored.
    pub async fn delete_reminder(&self, id: Uuid) -> Result<()> {
        self.commands
            .send(Command::Delete { id })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))
    }

    /// Push a reminder's deadline out to `duration` from now. Unknown ids
    /// and non-positive durations are ignored.
    pub async fn snooze_reminder(&self, id: Uuid, duration: Duration) -> Result<()> {
        self.commands
            .send(Command::Snooze { id, duration })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))
    }

    /// Snapshot of the host-facing list: the new-reminder affordance first,
    /// then every reminder in display order.
    pub async fn view_items(&self) -> Result<Vec<SillViewItem>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::ViewItems { reply: reply_tx })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("reminder service dropped the request"))
    }

    /// Entry point for toast activation. The argument is the reminder id the
    /// toast was posted with; activating dismisses that reminder. Arguments
    /// that do not parse are ignored.
    pub async fn toast_activated(&self, argument: &str) -> Result<()> {
        self.commands
            .send(Command::ToastActivated {
                argument: argument.to_string(),
            })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))
    }

    /// Run a sync pass now. Resolves true when a fresh pass completed;
    /// false when the pass failed or one was already running.
    pub async fn sync_now(&self) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::SyncNow {
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| anyhow!("reminder service is not running"))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("reminder service dropped the request"))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SillEvent> {
        self.events.subscribe()
    }

    /// Ask the service loop to stop. Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }
}

pub(crate) struct ReminderService {
    store: ReminderStore,
    scheduler: CountdownScheduler,
    notifier: Arc<Notifier>,
    sync: Arc<SyncEngine>,
    events: broadcast::Sender<SillEvent>,
    commands: mpsc::Receiver<Command>,
    self_tx: mpsc::Sender<Command>,
    sync_in_flight: bool,
}

impl ReminderService {
    /// Load persisted reminders, arm their deadlines, and start the loop.
    pub(crate) fn spawn(
        settings: SettingsStore,
        notifier: Arc<Notifier>,
        sync: Arc<SyncEngine>,
    ) -> (SillHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let store = ReminderStore::load(settings);
        let mut scheduler = CountdownScheduler::new();
        for reminder in store.iter() {
            scheduler.arm(reminder);
        }
        info!("Reminder service starting with {} reminders", store.len());

        let service = ReminderService {
            store,
            scheduler,
            notifier,
            sync,
            events: event_tx.clone(),
            commands: command_rx,
            self_tx: command_tx.clone(),
            sync_in_flight: false,
        };
        let task = tokio::spawn(service.run());

        (
            SillHandle {
                commands: command_tx,
                events: event_tx,
            },
            task,
        )
    }

    async fn run(mut self) {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks_since_sync: u64 = 0;

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                _ = interval.tick() => {
                    self.on_tick();
                    ticks_since_sync += 1;
                    if ticks_since_sync >= AUTO_SYNC_TICKS {
                        ticks_since_sync = 0;
                        self.maybe_auto_sync();
                    }
                }
            }
        }

        info!("Reminder service stopping");
        self.notifier.close_all();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Add {
                title,
                duration,
                reply,
            } => {
                let _ = reply.send(self.add(title, duration));
            }
            Command::Delete { id } => self.delete(id),
            Command::Snooze { id, duration } => self.snooze(id, duration),
            Command::ViewItems { reply } => {
                let _ = reply.send(self.view_items());
            }
            Command::ToastActivated { argument } => self.toast_activated(&argument),
            Command::NotifyFinished { id, outcome } => self.notify_finished(id, outcome),
            Command::SyncNow { reply } => self.start_sync(reply),
            Command::SyncFinished { merged } => self.finish_sync(merged),
            // Handled by the loop before dispatch.
            Command::Shutdown => {}
        }
    }

    fn add(&mut self, title: String, duration: Duration) -> Result<Reminder> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(anyhow!("reminder title must not be blank"));
        }
        if duration <= Duration::zero() {
            return Err(anyhow!("reminder duration must be positive"));
        }

        let reminder = self.store.add(title, duration, Utc::now());
        self.scheduler.arm(&reminder);
        self.publish(SillEvent::ListChanged);
        info!("Added reminder '{}' due {}", reminder.title, reminder.due_time);
        Ok(reminder)
    }

    fn delete(&mut self, id: Uuid) {
        if self.store.delete(id) {
            self.scheduler.disarm(id);
            self.publish(SillEvent::ListChanged);
            debug!("Deleted reminder {}", id);
        }
    }

    fn snooze(&mut self, id: Uuid, duration: Duration) {
        if duration <= Duration::zero() {
            warn!("Ignoring snooze with non-positive duration for {}", id);
            return;
        }
        match self.store.snooze(id, duration, Utc::now()) {
            Some(reminder) => {
                self.scheduler.arm(&reminder);
                self.publish(SillEvent::ListChanged);
                debug!("Snoozed reminder {} for {}s", id, duration.num_seconds());
            }
            None => debug!("Ignoring snooze for unknown reminder {}", id),
        }
    }

    fn view_items(&self) -> Vec<SillViewItem> {
        let now = Utc::now();
        let mut items = Vec::with_capacity(self.store.len() + 1);
        items.push(SillViewItem::NewReminder);
        for reminder in self.store.iter() {
            let expired = self.scheduler.is_expired(reminder.id);
            items.push(SillViewItem::Reminder(ReminderView::project(
                reminder, now, expired,
            )));
        }
        items
    }

    fn toast_activated(&mut self, argument: &str) {
        match argument.parse::<Uuid>() {
            Ok(id) => self.delete(id),
            Err(_) => debug!("Ignoring toast activation with argument '{}'", argument),
        }
    }

    fn notify_finished(&mut self, id: Uuid, outcome: NotifyOutcome) {
        match outcome {
            NotifyOutcome::Dismissed => self.delete(id),
            NotifyOutcome::Snoozed(duration) => self.snooze(id, duration),
            NotifyOutcome::Closed | NotifyOutcome::Delivered => {}
        }
    }

    fn on_tick(&mut self) {
        let outcome = self.scheduler.tick(Utc::now());
        for update in outcome.updates {
            self.publish(SillEvent::Tick(update));
        }
        for id in outcome.expired {
            self.publish(SillEvent::Expired { id });
            self.dispatch_notification(id);
        }
    }

    /// Hand an expired reminder to the notifier off-loop, and feed the
    /// outcome back in as a command when it resolves.
    fn dispatch_notification(&mut self, id: Uuid) {
        let reminder = match self.store.get(id) {
            Some(reminder) => reminder.clone(),
            None => return,
        };
        info!("Reminder '{}' is due", reminder.title);

        let notifier = Arc::clone(&self.notifier);
        let self_tx = self.self_tx.clone();
        tokio::spawn(async move {
            let outcome = match notifier.notify(&reminder).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to notify for reminder '{}': {}", reminder.title, e);
                    return;
                }
            };
            // The loop may already be gone at shutdown.
            let _ = self_tx
                .send(Command::NotifyFinished {
                    id: reminder.id,
                    outcome,
                })
                .await;
        });
    }

    fn start_sync(&mut self, reply: Option<oneshot::Sender<bool>>) {
        if self.sync_in_flight {
            debug!("Sync already in progress");
            if let Some(reply) = reply {
                let _ = reply.send(false);
            }
            return;
        }
        self.sync_in_flight = true;

        let local = self.store.snapshot();
        let sync = Arc::clone(&self.sync);
        let self_tx = self.self_tx.clone();
        tokio::spawn(async move {
            let merged = match sync.sync_reminders(&local).await {
                Ok(merged) => {
                    if let Some(reply) = reply {
                        let _ = reply.send(true);
                    }
                    merged
                }
                Err(e) => {
                    warn!("Sync pass failed: {}", e);
                    if let Some(reply) = reply {
                        let _ = reply.send(false);
                    }
                    None
                }
            };
            let _ = self_tx.send(Command::SyncFinished { merged }).await;
        });
    }

    fn finish_sync(&mut self, merged: Option<Vec<Reminder>>) {
        self.sync_in_flight = false;
        let merged = match merged {
            Some(merged) => merged,
            None => return,
        };

        self.store.replace_all(merged);

        // Drop deadlines for reminders the merge removed, then re-arm the
        // survivors without re-firing anything whose due time is unchanged.
        let keep: HashSet<Uuid> = self.store.iter().map(|reminder| reminder.id).collect();
        for id in self.scheduler.armed_ids() {
            if !keep.contains(&id) {
                self.scheduler.disarm(id);
            }
        }
        let store = &self.store;
        let scheduler = &mut self.scheduler;
        for reminder in store.iter() {
            scheduler.arm_preserving(reminder);
        }

        self.publish(SillEvent::ListChanged);
    }

    fn maybe_auto_sync(&mut self) {
        if !self.sync.is_ready() {
            return;
        }
        debug!("Starting automatic sync pass");
        self.start_sync(None);
    }

    // No subscribers is fine; events are advisory.
    fn publish(&self, event: SillEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{
        DisplayBounds, DisplayHost, NotificationSurface, SurfaceOutcome, SurfaceRequest,
        ToastHost, ToastRequest,
    };
    use crate::sync::{SyncError, SyncProvider};
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingToastHost {
        requests: Mutex<Vec<ToastRequest>>,
    }

    impl RecordingToastHost {
        fn new() -> Arc<Self> {
            Arc::new(RecordingToastHost {
                requests: Mutex::new(Vec::new()),
            })
        }

        fn len(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn argument(&self, index: usize) -> String {
            self.requests.lock().unwrap()[index].argument.clone()
        }
    }

    #[async_trait]
    impl ToastHost for RecordingToastHost {
        async fn show(&self, request: ToastRequest) -> Result<()> {
            self.requests.lock().unwrap().push(request);
            Ok(())
        }
    }

    struct NullDisplayHost;

    #[async_trait]
    impl DisplayHost for NullDisplayHost {
        fn displays(&self) -> Vec<DisplayBounds> {
            Vec::new()
        }

        async fn show(&self, _request: SurfaceRequest) -> Result<Arc<dyn NotificationSurface>> {
            bail!("no display backend in this test")
        }
    }

    struct AutoSurface {
        outcome: SurfaceOutcome,
    }

    #[async_trait]
    impl NotificationSurface for AutoSurface {
        async fn outcome(&self) -> SurfaceOutcome {
            self.outcome
        }

        fn close(&self) {}
    }

    /// One display whose surfaces resolve immediately with a fixed outcome.
    struct AutoDisplayHost {
        outcome: SurfaceOutcome,
        shown: AtomicUsize,
    }

    impl AutoDisplayHost {
        fn new(outcome: SurfaceOutcome) -> Arc<Self> {
            Arc::new(AutoDisplayHost {
                outcome,
                shown: AtomicUsize::new(0),
            })
        }

        fn shown(&self) -> usize {
            self.shown.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DisplayHost for AutoDisplayHost {
        fn displays(&self) -> Vec<DisplayBounds> {
            vec![DisplayBounds {
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
            }]
        }

        async fn show(&self, _request: SurfaceRequest) -> Result<Arc<dyn NotificationSurface>> {
            self.shown.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(AutoSurface {
                outcome: self.outcome,
            }))
        }
    }

    struct StubProvider {
        remote: Vec<Reminder>,
    }

    #[async_trait]
    impl SyncProvider for StubProvider {
        fn provider_name(&self) -> &str {
            "Stub Tasks"
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        async fn authenticate(&self) -> Result<bool, SyncError> {
            Ok(true)
        }

        async fn sign_out(&self) -> Result<(), SyncError> {
            Ok(())
        }

        async fn push_reminders(&self, _reminders: &[Reminder]) -> Result<(), SyncError> {
            Ok(())
        }

        async fn pull_reminders(&self) -> Result<Vec<Reminder>, SyncError> {
            Ok(self.remote.clone())
        }
    }

    fn start_service(
        settings: SettingsStore,
        displays: Arc<dyn DisplayHost>,
        toasts: Arc<dyn ToastHost>,
    ) -> (SillHandle, JoinHandle<()>, Arc<SyncEngine>) {
        let notifier = Arc::new(Notifier::new(displays, toasts, settings.clone()));
        let sync = Arc::new(SyncEngine::new(settings.clone()));
        let (handle, task) = ReminderService::spawn(settings, notifier, sync.clone());
        (handle, task, sync)
    }

    async fn reminder_views(handle: &SillHandle) -> Vec<ReminderView> {
        handle
            .view_items()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|item| match item {
                SillViewItem::Reminder(view) => Some(view),
                SillViewItem::NewReminder => None,
            })
            .collect()
    }

    async fn wait_for(condition: impl Fn() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(StdDuration::from_millis(50)).await;
        }
        panic!("condition not met within five seconds");
    }

    async fn wait_for_views(
        handle: &SillHandle,
        predicate: impl Fn(&[ReminderView]) -> bool,
    ) -> Vec<ReminderView> {
        let mut views = Vec::new();
        for _ in 0..100 {
            views = reminder_views(handle).await;
            if predicate(&views) {
                return views;
            }
            tokio::time::sleep(StdDuration::from_millis(50)).await;
        }
        panic!("view condition not met within five seconds: {:?}", views);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_titles_and_non_positive_durations() {
        let (handle, _task, _sync) = start_service(
            SettingsStore::in_memory(),
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        assert!(handle.add_reminder("   ", Duration::minutes(5)).await.is_err());
        assert!(handle.add_reminder("tea", Duration::zero()).await.is_err());
        assert!(handle
            .add_reminder("tea", Duration::minutes(-1))
            .await
            .is_err());

        assert!(reminder_views(&handle).await.is_empty());
    }

    #[tokio::test]
    async fn test_view_leads_with_the_new_reminder_item() {
        let (handle, _task, _sync) = start_service(
            SettingsStore::in_memory(),
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        let added = handle
            .add_reminder("  tea  ", Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(added.title, "tea");

        let items = handle.view_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], SillViewItem::NewReminder);
        match &items[1] {
            SillViewItem::Reminder(view) => {
                assert_eq!(view.id, added.id);
                assert_eq!(view.title, "tea");
                assert_eq!(view.progress_max_secs, 300);
            }
            other => panic!("expected a reminder view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_toast_mode_notifies_once_and_keeps_the_reminder() {
        let settings = SettingsStore::in_memory();
        settings.set_use_full_screen_notification(false).unwrap();
        let toasts = RecordingToastHost::new();
        let (handle, _task, _sync) =
            start_service(settings, Arc::new(NullDisplayHost), toasts.clone());

        let reminder = handle
            .add_reminder("tea", Duration::milliseconds(100))
            .await
            .unwrap();

        wait_for(|| toasts.len() == 1).await;
        assert_eq!(toasts.argument(0), reminder.id.to_string());

        // Two more ticks; the deadline must not fire again.
        tokio::time::sleep(StdDuration::from_millis(2200)).await;
        assert_eq!(toasts.len(), 1);

        let views = reminder_views(&handle).await;
        assert_eq!(views.len(), 1);
        assert!(views[0].expired);

        // Activating the toast dismisses the reminder.
        handle
            .toast_activated(&reminder.id.to_string())
            .await
            .unwrap();
        wait_for_views(&handle, |views| views.is_empty()).await;
    }

    #[tokio::test]
    async fn test_full_screen_dismiss_deletes_the_reminder() {
        let displays = AutoDisplayHost::new(SurfaceOutcome::Dismissed);
        let (handle, _task, _sync) = start_service(
            SettingsStore::in_memory(),
            displays.clone(),
            RecordingToastHost::new(),
        );

        handle
            .add_reminder("tea", Duration::milliseconds(100))
            .await
            .unwrap();

        wait_for_views(&handle, |views| views.is_empty()).await;
        assert_eq!(displays.shown(), 1);
    }

    #[tokio::test]
    async fn test_full_screen_snooze_rearms_the_reminder() {
        let displays = AutoDisplayHost::new(SurfaceOutcome::Snoozed(Duration::minutes(30)));
        let (handle, _task, _sync) = start_service(
            SettingsStore::in_memory(),
            displays.clone(),
            RecordingToastHost::new(),
        );

        let reminder = handle
            .add_reminder("tea", Duration::milliseconds(100))
            .await
            .unwrap();

        wait_for(|| displays.shown() == 1).await;
        let views = wait_for_views(&handle, |views| {
            views.len() == 1 && !views[0].expired && views[0].remaining_secs > 1700
        })
        .await;
        assert_eq!(views[0].id, reminder.id);
        assert_eq!(views[0].progress_max_secs, 30 * 60);
    }

    #[tokio::test]
    async fn test_expiry_is_broadcast_to_subscribers() {
        let settings = SettingsStore::in_memory();
        settings.set_use_full_screen_notification(false).unwrap();
        let (handle, _task, _sync) = start_service(
            settings,
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        let mut events = handle.subscribe();
        let reminder = handle
            .add_reminder("tea", Duration::milliseconds(100))
            .await
            .unwrap();

        let expired = tokio::time::timeout(StdDuration::from_secs(5), async {
            loop {
                match events.recv().await {
                    Ok(SillEvent::Expired { id }) => break id,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(expired, reminder.id);
    }

    #[tokio::test]
    async fn test_sync_now_adopts_remote_reminders() {
        let settings = SettingsStore::in_memory();
        let mut config = settings.sync_config();
        config.enabled = true;
        settings.set_sync_config(&config).unwrap();

        let (handle, _task, sync) = start_service(
            settings,
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        let remote = Reminder::new("from remote", Duration::minutes(45), Utc::now());
        sync.set_provider_instance(Arc::new(StubProvider {
            remote: vec![remote.clone()],
        }));

        assert!(handle.sync_now().await.unwrap());

        let views = wait_for_views(&handle, |views| views.len() == 1).await;
        assert_eq!(views[0].id, remote.id);
        assert_eq!(views[0].title, "from remote");
    }

    #[tokio::test]
    async fn test_sync_now_reports_failure_when_nothing_is_configured() {
        let (handle, _task, _sync) = start_service(
            SettingsStore::in_memory(),
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        assert!(!handle.sync_now().await.unwrap());
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_service() {
        let (handle, task, _sync) = start_service(
            SettingsStore::in_memory(),
            Arc::new(NullDisplayHost),
            RecordingToastHost::new(),
        );

        handle
            .add_reminder("tea", Duration::minutes(5))
            .await
            .unwrap();
        handle.shutdown().await;
        task.await.unwrap();

        assert!(handle
            .add_reminder("late", Duration::minutes(5))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_persisted_reminders_are_armed_on_start() {
        let settings = SettingsStore::in_memory();
        settings.set_use_full_screen_notification(false).unwrap();
        let now = Utc::now();
        let persisted = Reminder::new("from last session", Duration::milliseconds(100), now);
        settings.set_reminders(&[persisted.clone()]).unwrap();

        let toasts = RecordingToastHost::new();
        let (handle, _task, _sync) =
            start_service(settings, Arc::new(NullDisplayHost), toasts.clone());

        let views = reminder_views(&handle).await;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, persisted.id);

        // The restored deadline still fires.
        wait_for(|| toasts.len() == 1).await;
    }
}
