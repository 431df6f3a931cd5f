//! # Feature: Countdown Scheduler
//!
//! Tracks every armed reminder's deadline and turns the service's one-second
//! tick into countdown updates and expiry firings. Deadlines live in a
//! min-heap keyed by due time; re-arming (snooze, sync merge) stamps a fresh
//! generation instead of searching the heap, and stale heap entries are
//! skipped when they surface. Each armed deadline fires at most once.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: arm_preserving so sync merges do not re-fire unchanged deadlines
//! - 1.0.0: Initial creation with generation-stamped heap

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::Reminder;

/// One reminder's countdown state for a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickUpdate {
    pub id: Uuid,
    /// Seconds until the due time, clamped to zero once passed.
    pub remaining_secs: i64,
    /// Seconds the countdown started from; the progress display's maximum.
    pub progress_max_secs: i64,
}

impl TickUpdate {
    /// Remaining seconds clamped into the progress range, ready to hand to a
    /// bounded progress display.
    pub fn progress_secs(&self) -> i64 {
        self.remaining_secs.clamp(0, self.progress_max_secs.max(0))
    }
}

/// Everything one tick produced.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Countdown updates for reminders still running, plus a final zero
    /// update for each reminder expiring this tick.
    pub updates: Vec<TickUpdate>,
    /// Reminders whose deadline fired this tick.
    pub expired: Vec<Uuid>,
}

struct ArmedEntry {
    due_time: DateTime<Utc>,
    progress_max_secs: i64,
    generation: u64,
    expired: bool,
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    due_time: DateTime<Utc>,
    generation: u64,
    id: Uuid,
}

/// Deadline tracker for the reminder service. Single-owner; the service
/// calls it from its command loop only.
#[derive(Default)]
pub struct CountdownScheduler {
    armed: HashMap<Uuid, ArmedEntry>,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    next_generation: u64,
}

impl CountdownScheduler {
    pub fn new() -> Self {
        CountdownScheduler::default()
    }

    /// Arm (or re-arm) a reminder. Any previous deadline for the same id is
    /// invalidated, and a re-armed reminder may expire again.
    pub fn arm(&mut self, reminder: &Reminder) {
        self.insert(reminder, false);
    }

    /// Arm a reminder without re-firing it: when the reminder is already
    /// armed, already expired, and its due time has not moved, the expired
    /// state is kept. Sync merges use this so replacing the list with an
    /// equivalent one does not raise duplicate notifications.
    pub fn arm_preserving(&mut self, reminder: &Reminder) {
        let keep_expired = self
            .armed
            .get(&reminder.id)
            .map(|entry| entry.expired && entry.due_time == reminder.due_time)
            .unwrap_or(false);
        self.insert(reminder, keep_expired);
    }

    fn insert(&mut self, reminder: &Reminder, expired: bool) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.armed.insert(
            reminder.id,
            ArmedEntry {
                due_time: reminder.due_time,
                progress_max_secs: reminder.created_duration.num_seconds().max(0),
                generation,
                expired,
            },
        );
        self.queue.push(Reverse(QueueEntry {
            due_time: reminder.due_time,
            generation,
            id: reminder.id,
        }));
    }

    pub fn disarm(&mut self, id: Uuid) {
        self.armed.remove(&id);
    }

    /// Whether this reminder's deadline has already fired.
    pub fn is_expired(&self, id: Uuid) -> bool {
        self.armed.get(&id).map(|entry| entry.expired).unwrap_or(false)
    }

    pub fn armed_ids(&self) -> Vec<Uuid> {
        self.armed.keys().copied().collect()
    }

    /// Advance the scheduler to `now`.
    ///
    /// Pops every deadline at or before `now`, discarding entries whose
    /// generation no longer matches the armed state. Reminders expiring this
    /// tick appear once in `expired` and get a final zero-remaining update;
    /// reminders that expired on an earlier tick stay silent.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut newly_expired = Vec::new();

        loop {
            let entry = match self.queue.pop() {
                Some(Reverse(entry)) => entry,
                None => break,
            };
            if entry.due_time > now {
                // Not due yet; put it back and stop draining.
                self.queue.push(Reverse(entry));
                break;
            }
            let armed = match self.armed.get_mut(&entry.id) {
                Some(armed) => armed,
                None => continue,
            };
            // Stale heap entry from before a re-arm or a deadline that
            // already fired.
            if armed.generation != entry.generation || armed.expired {
                continue;
            }
            armed.expired = true;
            newly_expired.push(entry.id);
        }

        let mut updates = Vec::with_capacity(self.armed.len());
        for (id, armed) in &self.armed {
            if armed.expired && !newly_expired.contains(id) {
                continue;
            }
            let remaining = (armed.due_time - now).num_seconds().max(0);
            updates.push(TickUpdate {
                id: *id,
                remaining_secs: remaining,
                progress_max_secs: armed.progress_max_secs,
            });
        }

        TickOutcome {
            updates,
            expired: newly_expired,
        }
    }
}
