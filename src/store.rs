use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Storage slot names. These match the on-disk JSON keys and are part of
/// the export format, so they stay camelCase.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const FOCUS_SESSIONS_TODAY: &str = "focusSessionsToday";
    pub const TOTAL_FOCUS_TIME_TODAY: &str = "totalFocusTimeToday";
    pub const COMPLETED_STREAK: &str = "completedStreak";
    pub const LAST_STREAK_DATE: &str = "lastStreakDate";
    pub const DAILY_GOAL: &str = "dailyGoal";
    pub const THEME: &str = "theme";
    pub const LAST_ACTIVE_DATE: &str = "lastActiveDate";
    pub const RECENT_ACTIVITIES: &str = "recentActivities";
    pub const HAS_VISITED: &str = "hasVisited";
}

/// Key/value store backed by a single JSON file. Every mutation is
/// persisted immediately, best-effort: write failures are logged and
/// swallowed, a corrupt or missing file reads as empty.
pub struct Store {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl Store {
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Corrupt state file {}: {} — starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self { path, values }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.values.get(key)?.as_u64().and_then(|n| u32::try_from(n).ok())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key)?.as_bool()
    }

    /// Deserialize a JSON blob slot. A slot with the wrong shape reads as
    /// absent, the same as a corrupt file.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Ignoring malformed slot '{}': {}", key, e);
                None
            }
        }
    }

    pub fn set_u32(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush();
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush();
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush();
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(key.to_string(), v);
                self.flush();
            }
            Err(e) => warn!("Failed to serialize slot '{}': {}", key, e),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.flush();
    }

    /// Fire-and-forget write of the whole map.
    pub fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("Failed to create {}: {}", parent.display(), e);
                    return;
                }
            }
        }

        let content = match serde_json::to_string_pretty(&self.values) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to serialize state: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, content) {
            warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}
