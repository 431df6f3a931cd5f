//! # Feature: Reminder Store
//!
//! The in-memory reminder list and its persistence discipline. The list is
//! kept sorted by due time at insert; snoozing deliberately leaves a
//! reminder in place so the row the user just touched does not jump around,
//! and the persisted order is trusted verbatim on load. Every mutation is
//! mirrored to the settings store.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: replace_all for sync merges
//! - 1.0.0: Initial creation with add/delete/snooze

use chrono::{DateTime, Duration, Utc};
use log::error;
use uuid::Uuid;

use crate::core::Reminder;
use crate::settings::SettingsStore;

/// Owner of the reminder list. Not shared; the reminder service owns one and
/// serializes access through its command loop.
pub struct ReminderStore {
    reminders: Vec<Reminder>,
    settings: SettingsStore,
}

impl ReminderStore {
    /// Load the persisted list. The saved order is preserved as-is, so a
    /// snoozed reminder keeps its place across restarts.
    pub fn load(settings: SettingsStore) -> Self {
        ReminderStore {
            reminders: settings.reminders(),
            settings,
        }
    }

    /// Create a reminder due `duration` from `now` and insert it in due-time
    /// order, after any reminder due at the same instant.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Reminder {
        let reminder = Reminder::new(title, duration, now);
        let position = self
            .reminders
            .iter()
            .position(|existing| existing.due_time > reminder.due_time)
            .unwrap_or(self.reminders.len());
        self.reminders.insert(position, reminder.clone());
        self.save_all();
        reminder
    }

    /// Remove the reminder with `id`. Returns whether anything was removed;
    /// the list is persisted either way.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|reminder| reminder.id != id);
        self.save_all();
        self.reminders.len() < before
    }

    /// Re-arm the reminder with `id` for `duration` from `now`, keeping its
    /// position in the list. Returns the updated reminder, or `None` when
    /// the id is unknown.
    pub fn snooze(
        &mut self,
        id: Uuid,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Option<Reminder> {
        let reminder = self.reminders.iter_mut().find(|reminder| reminder.id == id)?;
        reminder.snooze(duration, now);
        let updated = reminder.clone();
        self.save_all();
        Some(updated)
    }

    /// Replace the whole list, typically with a sync merge result. The new
    /// list is re-sorted by due time before persisting.
    pub fn replace_all(&mut self, mut reminders: Vec<Reminder>) {
        reminders.sort_by_key(|reminder| reminder.due_time);
        self.reminders = reminders;
        self.save_all();
    }

    pub fn get(&self, id: Uuid) -> Option<&Reminder> {
        self.reminders.iter().find(|reminder| reminder.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    /// Owned copy of the current list, in display order.
    pub fn snapshot(&self) -> Vec<Reminder> {
        self.reminders.clone()
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    // Persistence failures are logged, not propagated: the in-memory list
    // stays authoritative for the session.
    fn save_all(&self) {
        if let Err(e) = self.settings.set_reminders(&self.reminders) {
            error!("Failed to persist reminders: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store() -> ReminderStore {
        ReminderStore::load(SettingsStore::in_memory())
    }

    fn due_times(store: &ReminderStore) -> Vec<DateTime<Utc>> {
        store.iter().map(|reminder| reminder.due_time).collect()
    }

    #[test]
    fn test_add_keeps_list_sorted_by_due_time() {
        let now = base_time();
        let mut store = store();

        store.add("third", Duration::minutes(30), now);
        store.add("first", Duration::minutes(5), now);
        store.add("second", Duration::minutes(15), now);

        let times = due_times(&store);
        assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
        let titles: Vec<&str> = store.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_add_places_equal_due_times_after_existing() {
        let now = base_time();
        let mut store = store();

        let a = store.add("a", Duration::minutes(10), now);
        let b = store.add("b", Duration::minutes(10), now);

        let ids: Vec<Uuid> = store.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_delete_removes_only_the_matching_id() {
        let now = base_time();
        let mut store = store();

        let keep = store.add("keep", Duration::minutes(5), now);
        let drop = store.add("drop", Duration::minutes(10), now);

        assert!(store.delete(drop.id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(keep.id).map(|r| r.id), Some(keep.id));
    }

    #[test]
    fn test_delete_unknown_id_returns_false() {
        let now = base_time();
        let mut store = store();
        store.add("only", Duration::minutes(5), now);

        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snooze_updates_fields_but_keeps_position() {
        let now = base_time();
        let mut store = store();

        let first = store.add("first", Duration::minutes(5), now);
        store.add("second", Duration::minutes(10), now);
        store.add("third", Duration::minutes(15), now);

        let later = now + Duration::minutes(5);
        let updated = store.snooze(first.id, Duration::hours(1), later);

        let updated = updated.expect("snoozed reminder");
        assert_eq!(updated.due_time, later + Duration::hours(1));
        assert_eq!(updated.created_duration, Duration::hours(1));
        assert_eq!(updated.last_modified, later);

        // Now due last, but still listed first.
        let titles: Vec<&str> = store.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_snooze_unknown_id_returns_none() {
        let now = base_time();
        let mut store = store();
        store.add("only", Duration::minutes(5), now);

        assert!(store.snooze(Uuid::new_v4(), Duration::minutes(5), now).is_none());
    }

    #[test]
    fn test_load_preserves_persisted_order() {
        let now = base_time();
        let settings = SettingsStore::in_memory();

        // Persist an order that is deliberately not sorted by due time, as a
        // snooze would leave it.
        let late = Reminder::new("late", Duration::minutes(50), now);
        let early = Reminder::new("early", Duration::minutes(5), now);
        settings
            .set_reminders(&[late.clone(), early.clone()])
            .unwrap();

        let store = ReminderStore::load(settings);
        let ids: Vec<Uuid> = store.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![late.id, early.id]);
    }

    #[test]
    fn test_replace_all_sorts_by_due_time() {
        let now = base_time();
        let mut store = store();

        let late = Reminder::new("late", Duration::minutes(50), now);
        let early = Reminder::new("early", Duration::minutes(5), now);
        store.replace_all(vec![late.clone(), early.clone()]);

        let ids: Vec<Uuid> = store.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn test_every_mutation_is_mirrored_to_settings() {
        let now = base_time();
        let settings = SettingsStore::in_memory();
        let mut store = ReminderStore::load(settings.clone());

        let added = store.add("tea", Duration::minutes(5), now);
        assert_eq!(settings.reminders(), store.snapshot());

        store.snooze(added.id, Duration::minutes(10), now);
        assert_eq!(settings.reminders(), store.snapshot());

        store.delete(added.id);
        assert_eq!(settings.reminders(), store.snapshot());
        assert!(settings.reminders().is_empty());
    }
}
