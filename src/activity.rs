use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::model::ActivityEntry;
use crate::store::{keys, Store};

pub const ACTIVITY_CAP: usize = 10;

/// Bounded ring of human-readable event lines, newest first. Entries
/// beyond the cap are dropped and never persisted.
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn load(store: &Store) -> Self {
        let mut entries: VecDeque<ActivityEntry> = store
            .get_json::<Vec<ActivityEntry>>(keys::RECENT_ACTIVITIES)
            .unwrap_or_default()
            .into();
        entries.truncate(ACTIVITY_CAP);
        Self { entries }
    }

    pub fn append(&mut self, store: &mut Store, text: impl Into<String>, now: DateTime<Local>) {
        self.entries.push_front(ActivityEntry {
            text: text.into(),
            time: now.format("%I:%M %p").to_string(),
        });
        self.entries.truncate(ACTIVITY_CAP);
        self.persist(store);
    }

    pub fn clear(&mut self, store: &mut Store) {
        self.entries.clear();
        store.remove(keys::RECENT_ACTIVITIES);
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self, store: &mut Store) {
        let entries: Vec<&ActivityEntry> = self.entries.iter().collect();
        store.set_json(keys::RECENT_ACTIVITIES, &entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, ActivityLog) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let log = ActivityLog::load(&store);
        (dir, store, log)
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let (_dir, _store, log) = setup();
        assert!(log.is_empty());
    }

    #[test]
    fn test_newest_entry_first() {
        let (_dir, mut store, mut log) = setup();
        log.append(&mut store, "first", at(9, 0));
        log.append(&mut store, "second", at(9, 5));

        let texts: Vec<&str> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn test_never_exceeds_cap() {
        let (_dir, mut store, mut log) = setup();
        for i in 0..25 {
            log.append(&mut store, format!("event {}", i), at(9, 0));
        }

        assert_eq!(log.len(), ACTIVITY_CAP);
        assert_eq!(log.entries().next().unwrap().text, "event 24");

        // The persisted form is capped too.
        let reloaded = ActivityLog::load(&store);
        assert_eq!(reloaded.len(), ACTIVITY_CAP);
        assert_eq!(reloaded.entries().next().unwrap().text, "event 24");
    }

    #[test]
    fn test_clear_removes_persisted_slot() {
        let (_dir, mut store, mut log) = setup();
        log.append(&mut store, "something", at(9, 0));
        log.clear(&mut store);

        assert!(log.is_empty());
        assert!(!store.contains(keys::RECENT_ACTIVITIES));
        assert!(ActivityLog::load(&store).is_empty());
    }

    #[test]
    fn test_time_is_formatted_clock() {
        let (_dir, mut store, mut log) = setup();
        log.append(&mut store, "morning", at(9, 30));
        assert_eq!(log.entries().next().unwrap().time, "09:30 AM");
    }
}
