//! # Sill Events and Views
//!
//! Broadcast events the reminder service publishes every tick, and the view
//! items a host renders into its reminder list. Views are plain data
//! projected from the store under the service's lock discipline, so hosts
//! never touch live state.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::Reminder;
use crate::service::scheduler::TickUpdate;

/// Events published on the service's broadcast channel. Slow subscribers may
/// observe lagged ticks; state-bearing changes are recoverable by asking for
/// a fresh view.
#[derive(Debug, Clone)]
pub enum SillEvent {
    /// The reminder list changed (add, delete, snooze, or sync merge).
    ListChanged,
    /// One reminder's countdown advanced.
    Tick(TickUpdate),
    /// One reminder's deadline fired.
    Expired { id: Uuid },
}

/// One row in the host's reminder list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SillViewItem {
    /// The leading "add a reminder" affordance.
    NewReminder,
    Reminder(ReminderView),
}

/// Snapshot of one reminder, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderView {
    pub id: Uuid,
    pub title: String,
    pub due_time: DateTime<Utc>,
    pub remaining_secs: i64,
    pub progress_max_secs: i64,
    pub expired: bool,
}

impl ReminderView {
    pub(crate) fn project(reminder: &Reminder, now: DateTime<Utc>, expired: bool) -> Self {
        ReminderView {
            id: reminder.id,
            title: reminder.title.clone(),
            due_time: reminder.due_time,
            remaining_secs: reminder.remaining(now).num_seconds(),
            progress_max_secs: reminder.created_duration.num_seconds(),
            expired,
        }
    }

    /// Remaining seconds clamped into the progress range.
    pub fn progress_secs(&self) -> i64 {
        self.remaining_secs.clamp(0, self.progress_max_secs.max(0))
    }
}
