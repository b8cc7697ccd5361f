use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounting::DEFAULT_DAILY_GOAL;
use crate::error::{BenkyoError, Result};
use crate::model::{Task, Theme};

/// Full backup of core state. The field names are the on-disk storage
/// keys, so an export is readable next to the state file and older backups
/// with missing fields still import.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub focus_sessions_today: u32,
    pub total_focus_time_today: u32,
    pub completed_streak: u32,
    pub daily_goal: u32,
    /// Absent in the payload means "keep the current theme".
    pub theme: Option<Theme>,
    pub export_date: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            focus_sessions_today: 0,
            total_focus_time_today: 0,
            completed_streak: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            theme: None,
            export_date: None,
        }
    }
}

impl Snapshot {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BenkyoError::MalformedImport(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line summary shown before the caller confirms a wholesale
    /// replace.
    pub fn describe(&self) -> String {
        format!(
            "{} task(s), streak {}, daily goal {}",
            self.tasks.len(),
            self.completed_streak,
            self.daily_goal
        )
    }
}
