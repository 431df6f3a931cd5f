//! # Last-Writer Merge
//!
//! Reconciles the local reminder list with a remote pull. Remote reminders
//! match local ones on `external_id`; a matched remote copy wins only when
//! it is strictly newer, and it keeps the local id so open notifications and
//! armed deadlines still point at the same reminder. Unmatched remote
//! reminders are adopted as new.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use crate::core::Reminder;

/// Merge `remote` into `local`, last writer wins, ties keeping the local
/// copy. The result is sorted by due time.
pub fn merge_by_last_modified(local: &[Reminder], remote: &[Reminder]) -> Vec<Reminder> {
    let mut merged = local.to_vec();

    for incoming in remote {
        // A reminder with no external id has never been linked; it can only
        // be adopted, never matched.
        let matched = incoming.external_id.as_deref().and_then(|external_id| {
            merged
                .iter()
                .position(|existing| existing.external_id.as_deref() == Some(external_id))
        });

        match matched {
            Some(index) => {
                if incoming.last_modified > merged[index].last_modified {
                    let local_id = merged[index].id;
                    merged[index] = Reminder {
                        id: local_id,
                        ..incoming.clone()
                    };
                }
            }
            None => merged.push(incoming.clone()),
        }
    }

    merged.sort_by_key(|reminder| reminder.due_time);
    merged
}
