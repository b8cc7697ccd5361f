use chrono::{DateTime, Local, NaiveDate};

use crate::accounting::DailyAccounting;
use crate::activity::ActivityLog;
use crate::error::Result;
use crate::model::{NewTask, Task, TaskFilter, TaskId, Theme};
use crate::repo::{TaskRepository, TaskStats};
use crate::snapshot::Snapshot;
use crate::store::{keys, Store};
use crate::timer::{Completion, TimerMode};

pub struct CompleteOutcome {
    pub task: Task,
    pub streak_incremented: bool,
    pub streak: u32,
}

/// Owns the store and every stateful component. All mutations flow through
/// the command methods here: mutate, persist, record an activity entry,
/// return the read-model. The view layer (CLI) never touches the store.
pub struct App {
    pub store: Store,
    pub repo: TaskRepository,
    pub accounting: DailyAccounting,
    pub activity: ActivityLog,
    pub theme: Theme,
}

impl App {
    /// Session start: load state, roll the day boundary, greet first-time
    /// users (tracked by the `hasVisited` sentinel).
    pub fn init(mut store: Store, default_theme: Theme, now: DateTime<Local>) -> Self {
        let today = now.date_naive();

        let theme = store
            .get_str(keys::THEME)
            .and_then(Theme::parse)
            .unwrap_or(default_theme);

        let repo = TaskRepository::load(&mut store, today, now.to_utc());
        let mut accounting = DailyAccounting::load(&store);
        accounting.check_new_day(&mut store, today);
        let mut activity = ActivityLog::load(&store);

        if !store.get_bool(keys::HAS_VISITED).unwrap_or(false) {
            activity.append(&mut store, "Welcome to benkyo! 👋", now);
            store.set_bool(keys::HAS_VISITED, true);
        }

        Self {
            store,
            repo,
            accounting,
            activity,
            theme,
        }
    }

    pub fn flush(&self) {
        self.store.flush();
    }

    pub fn add_task(&mut self, new: NewTask, now: DateTime<Local>) -> Result<Task> {
        let task = self.repo.add(&mut self.store, new, now.to_utc())?;
        self.activity
            .append(&mut self.store, format!("Added task: {}", task.title), now);
        Ok(task)
    }

    /// Completion also re-evaluates the streak against today's goal.
    pub fn complete_task(&mut self, id: TaskId, now: DateTime<Local>) -> Result<CompleteOutcome> {
        let today = now.date_naive();
        let task = self.repo.complete(&mut self.store, id, now.to_utc())?;
        self.activity
            .append(&mut self.store, format!("Completed: {}", task.title), now);

        let streak_incremented = self.evaluate_streak(today);

        Ok(CompleteOutcome {
            task,
            streak_incremented,
            streak: self.accounting.completed_streak,
        })
    }

    pub fn evaluate_streak(&mut self, today: NaiveDate) -> bool {
        let completed_today = self.repo.completed_due_today(today);
        self.accounting
            .evaluate_streak(&mut self.store, completed_today, today)
    }

    /// First half of the delete handshake: describe what would be removed.
    /// Nothing is mutated until `delete_task` confirms.
    pub fn request_delete(&self, id: TaskId) -> Result<String> {
        let task = self
            .repo
            .get(id)
            .ok_or(crate::error::BenkyoError::NotFound(id))?;
        Ok(format!("Are you sure you want to delete \"{}\"?", task.title))
    }

    pub fn delete_task(&mut self, id: TaskId, now: DateTime<Local>) -> Result<Task> {
        let task = self.repo.delete(&mut self.store, id)?;
        self.activity
            .append(&mut self.store, format!("Deleted task: {}", task.title), now);
        Ok(task)
    }

    pub fn query_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.repo.query(filter)
    }

    pub fn task_stats(&self, today: NaiveDate) -> TaskStats {
        self.repo.stats(today)
    }

    pub fn set_daily_goal(&mut self, goal: u32) -> Result<()> {
        self.accounting.set_daily_goal(&mut self.store, goal)
    }

    pub fn set_theme(&mut self, theme: Theme, now: DateTime<Local>) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.store.set_str(keys::THEME, theme.name());
        self.activity
            .append(&mut self.store, format!("Switched to {} mode", theme.name()), now);
    }

    pub fn toggle_theme(&mut self, now: DateTime<Local>) -> Theme {
        self.set_theme(self.theme.toggled(), now);
        self.theme
    }

    pub fn log_session_started(&mut self, label: &str, now: DateTime<Local>) {
        self.activity
            .append(&mut self.store, format!("Started {}", label), now);
    }

    pub fn log_session_paused(&mut self, label: &str, now: DateTime<Local>) {
        self.activity
            .append(&mut self.store, format!("Paused {}", label), now);
    }

    pub fn log_session_interrupted(&mut self, label: &str, now: DateTime<Local>) {
        self.activity
            .append(&mut self.store, format!("Paused {} (screen hidden)", label), now);
    }

    /// Feeds a finished countdown into accounting. Only Focus sessions
    /// count toward the daily totals; breaks just leave a trace.
    pub fn record_completion(&mut self, completion: &Completion, now: DateTime<Local>) {
        if completion.mode == TimerMode::Focus {
            self.accounting
                .record_focus_completion(&mut self.store, completion.minutes_elapsed);
            self.activity
                .append(&mut self.store, "Completed focus session!", now);
        } else {
            self.activity.append(
                &mut self.store,
                format!("Completed {}", completion.mode.label()),
                now,
            );
        }
    }

    pub fn clear_activity(&mut self) {
        self.activity.clear(&mut self.store);
    }

    pub fn export_snapshot(&mut self, now: DateTime<Local>) -> Snapshot {
        let snapshot = Snapshot {
            tasks: self.repo.all().to_vec(),
            focus_sessions_today: self.accounting.focus_sessions_today,
            total_focus_time_today: self.accounting.total_focus_minutes_today,
            completed_streak: self.accounting.completed_streak,
            daily_goal: self.accounting.daily_goal,
            theme: Some(self.theme),
            export_date: Some(now.to_utc()),
        };
        self.activity
            .append(&mut self.store, "Data exported successfully", now);
        snapshot
    }

    /// First half of the import handshake: parse and summarize without
    /// touching any state.
    pub fn preview_import(&self, json: &str) -> Result<Snapshot> {
        Snapshot::parse(json)
    }

    /// Replaces tasks, counters, goal and (when present) theme wholesale.
    pub fn apply_import(&mut self, snapshot: Snapshot, now: DateTime<Local>) {
        self.repo.replace_all(&mut self.store, snapshot.tasks);
        self.accounting.restore(
            &mut self.store,
            snapshot.focus_sessions_today,
            snapshot.total_focus_time_today,
            snapshot.completed_streak,
            snapshot.daily_goal,
        );
        if let Some(theme) = snapshot.theme {
            self.theme = theme;
            self.store.set_str(keys::THEME, theme.name());
        }
        self.activity
            .append(&mut self.store, "Data imported successfully", now);
    }
}
