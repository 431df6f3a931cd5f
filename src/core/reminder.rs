//! # Reminder Entity
//!
//! The core reminder record: a titled countdown with a due time, the
//! originally requested duration, and the bookkeeping fields the sync layer
//! matches and merges on.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: external_id/last_modified for task-service sync
//! - 1.0.0: Initial record with countdown fields

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single short-term reminder.
///
/// `id` is assigned at creation and never changes; every other field may be
/// rewritten by a snooze or a sync merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    /// The duration the user originally asked for. Bounds the countdown
    /// progress display; rewritten by snooze.
    #[serde(with = "duration_secs")]
    pub created_duration: Duration,
    pub due_time: DateTime<Utc>,
    /// Identifier of the matching item on a remote task service, if synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub last_modified: DateTime<Utc>,
}

impl Reminder {
    /// Create a reminder due `duration` from `now`.
    pub fn new(title: impl Into<String>, duration: Duration, now: DateTime<Utc>) -> Self {
        Reminder {
            id: Uuid::new_v4(),
            title: title.into(),
            created_duration: duration,
            due_time: now + duration,
            external_id: None,
            last_modified: now,
        }
    }

    /// Re-arm this reminder for `duration` from `now`, in place.
    ///
    /// The id stays. The modification timestamp is refreshed so a snoozed
    /// reminder wins last-writer merges against stale remote copies.
    pub fn snooze(&mut self, duration: Duration, now: DateTime<Utc>) {
        self.created_duration = duration;
        self.due_time = now + duration;
        self.last_modified = now;
    }

    /// Time left until the due time, clamped to zero once passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = self.due_time - now;
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }

}

/// Persist `created_duration` as whole seconds.
mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::seconds(i64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_sets_due_time_from_duration() {
        let now = base_time();
        let reminder = Reminder::new("tea", Duration::minutes(30), now);

        assert_eq!(reminder.title, "tea");
        assert_eq!(reminder.due_time, now + Duration::minutes(30));
        assert_eq!(reminder.created_duration, Duration::minutes(30));
        assert_eq!(reminder.last_modified, now);
        assert_eq!(reminder.external_id, None);
    }

    #[test]
    fn test_snooze_rewrites_due_time_and_duration() {
        let now = base_time();
        let mut reminder = Reminder::new("tea", Duration::minutes(30), now);
        let id = reminder.id;

        let later = now + Duration::minutes(10);
        reminder.snooze(Duration::minutes(5), later);

        assert_eq!(reminder.id, id);
        assert_eq!(reminder.due_time, later + Duration::minutes(5));
        assert_eq!(reminder.created_duration, Duration::minutes(5));
        assert_eq!(reminder.last_modified, later);
    }

    #[test]
    fn test_remaining_clamps_to_zero() {
        let now = base_time();
        let reminder = Reminder::new("tea", Duration::minutes(1), now);

        assert_eq!(reminder.remaining(now), Duration::minutes(1));
        assert_eq!(
            reminder.remaining(now + Duration::seconds(40)),
            Duration::seconds(20)
        );
        assert_eq!(
            reminder.remaining(now + Duration::minutes(2)),
            Duration::zero()
        );
    }

    #[test]
    fn test_serde_round_trip_preserves_all_fields() {
        let now = base_time();
        let mut reminder = Reminder::new("call mom", Duration::minutes(45), now);
        reminder.external_id = Some("remote-123".to_string());

        let json = serde_json::to_string(&reminder).unwrap();
        let parsed: Reminder = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, reminder);
    }

    #[test]
    fn test_created_duration_serializes_as_seconds() {
        let reminder = Reminder::new("tea", Duration::minutes(2), base_time());
        let value = serde_json::to_value(&reminder).unwrap();

        assert_eq!(value["created_duration"], serde_json::json!(120));
    }

    #[test]
    fn test_missing_external_id_omitted_from_json() {
        let reminder = Reminder::new("tea", Duration::minutes(2), base_time());
        let value = serde_json::to_value(&reminder).unwrap();

        assert!(value.get("external_id").is_none());
    }
}
