use chrono::NaiveDate;

use crate::error::{BenkyoError, Result};
use crate::store::{keys, Store};

pub const DEFAULT_DAILY_GOAL: u32 = 5;

/// Per-day focus counters, the completion streak, and the daily goal.
/// Counters live in the store under their own slots and reset at local-day
/// boundaries; the streak survives as long as no calendar day is skipped.
pub struct DailyAccounting {
    pub focus_sessions_today: u32,
    pub total_focus_minutes_today: u32,
    pub completed_streak: u32,
    pub daily_goal: u32,
    last_streak_date: Option<NaiveDate>,
    last_active_date: Option<NaiveDate>,
}

impl DailyAccounting {
    pub fn load(store: &Store) -> Self {
        Self {
            focus_sessions_today: store.get_u32(keys::FOCUS_SESSIONS_TODAY).unwrap_or(0),
            total_focus_minutes_today: store.get_u32(keys::TOTAL_FOCUS_TIME_TODAY).unwrap_or(0),
            completed_streak: store.get_u32(keys::COMPLETED_STREAK).unwrap_or(0),
            daily_goal: store.get_u32(keys::DAILY_GOAL).unwrap_or(DEFAULT_DAILY_GOAL),
            last_streak_date: parse_date(store.get_str(keys::LAST_STREAK_DATE)),
            last_active_date: parse_date(store.get_str(keys::LAST_ACTIVE_DATE)),
        }
    }

    /// Runs once per session start. On a day change the focus counters
    /// reset; the streak resets too unless the last active day was exactly
    /// yesterday. Calling again with the same date changes nothing.
    pub fn check_new_day(&mut self, store: &mut Store, today: NaiveDate) {
        if self.last_active_date == Some(today) {
            return;
        }

        if let Some(last) = self.last_active_date {
            if last != today - chrono::Duration::days(1) {
                self.completed_streak = 0;
                store.set_u32(keys::COMPLETED_STREAK, 0);
            }
        }

        self.focus_sessions_today = 0;
        self.total_focus_minutes_today = 0;
        store.set_u32(keys::FOCUS_SESSIONS_TODAY, 0);
        store.set_u32(keys::TOTAL_FOCUS_TIME_TODAY, 0);

        self.last_active_date = Some(today);
        store.set_str(keys::LAST_ACTIVE_DATE, &today.to_string());
    }

    pub fn record_focus_completion(&mut self, store: &mut Store, minutes_elapsed: f64) {
        self.focus_sessions_today += 1;
        self.total_focus_minutes_today += minutes_elapsed.round().max(0.0) as u32;
        store.set_u32(keys::FOCUS_SESSIONS_TODAY, self.focus_sessions_today);
        store.set_u32(keys::TOTAL_FOCUS_TIME_TODAY, self.total_focus_minutes_today);
    }

    /// Increments the streak when the goal is met, at most once per
    /// calendar day. Returns whether this call incremented it; callers
    /// celebrate only when the resulting streak is above 1.
    pub fn evaluate_streak(&mut self, store: &mut Store, completed_today: u32, today: NaiveDate) -> bool {
        if completed_today < self.daily_goal || self.last_streak_date == Some(today) {
            return false;
        }

        self.completed_streak += 1;
        self.last_streak_date = Some(today);
        store.set_u32(keys::COMPLETED_STREAK, self.completed_streak);
        store.set_str(keys::LAST_STREAK_DATE, &today.to_string());
        true
    }

    /// Goal progress for display, clamped to 100. The raw ratio may exceed
    /// the goal; over-completion is not tracked here.
    pub fn progress_percent(&self, completed_today: u32) -> u32 {
        if self.daily_goal == 0 {
            return 0;
        }
        let raw = (f64::from(completed_today) / f64::from(self.daily_goal) * 100.0).round() as u32;
        raw.min(100)
    }

    pub fn set_daily_goal(&mut self, store: &mut Store, goal: u32) -> Result<()> {
        if goal == 0 {
            return Err(BenkyoError::Validation("daily goal must be at least 1".into()));
        }
        self.daily_goal = goal;
        store.set_u32(keys::DAILY_GOAL, goal);
        Ok(())
    }

    pub fn last_streak_date(&self) -> Option<NaiveDate> {
        self.last_streak_date
    }

    /// Wholesale replacement of the counters, used by snapshot import.
    pub fn restore(&mut self, store: &mut Store, sessions: u32, minutes: u32, streak: u32, goal: u32) {
        self.focus_sessions_today = sessions;
        self.total_focus_minutes_today = minutes;
        self.completed_streak = streak;
        self.daily_goal = goal.max(1);
        store.set_u32(keys::FOCUS_SESSIONS_TODAY, sessions);
        store.set_u32(keys::TOTAL_FOCUS_TIME_TODAY, minutes);
        store.set_u32(keys::COMPLETED_STREAK, streak);
        store.set_u32(keys::DAILY_GOAL, self.daily_goal);
    }
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        (dir, store)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let (_dir, store) = setup();
        let acc = DailyAccounting::load(&store);
        assert_eq!(acc.focus_sessions_today, 0);
        assert_eq!(acc.completed_streak, 0);
        assert_eq!(acc.daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_check_new_day_is_idempotent() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);

        acc.check_new_day(&mut store, day(10));
        acc.record_focus_completion(&mut store, 25.0);
        assert_eq!(acc.focus_sessions_today, 1);

        acc.check_new_day(&mut store, day(10));
        assert_eq!(acc.focus_sessions_today, 1);
        assert_eq!(acc.total_focus_minutes_today, 25);
    }

    #[test]
    fn test_day_change_resets_counters() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);

        acc.check_new_day(&mut store, day(10));
        acc.record_focus_completion(&mut store, 25.0);
        acc.check_new_day(&mut store, day(11));

        assert_eq!(acc.focus_sessions_today, 0);
        assert_eq!(acc.total_focus_minutes_today, 0);
        assert_eq!(store.get_u32(keys::FOCUS_SESSIONS_TODAY), Some(0));
    }

    #[test]
    fn test_streak_survives_consecutive_days() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);

        acc.check_new_day(&mut store, day(10));
        acc.completed_streak = 3;
        store.set_u32(keys::COMPLETED_STREAK, 3);

        // Next day, goal not yet met: streak untouched.
        acc.check_new_day(&mut store, day(11));
        assert_eq!(acc.completed_streak, 3);
    }

    #[test]
    fn test_streak_resets_after_skipped_day() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);

        acc.check_new_day(&mut store, day(10));
        acc.completed_streak = 3;
        store.set_u32(keys::COMPLETED_STREAK, 3);

        acc.check_new_day(&mut store, day(12));
        assert_eq!(acc.completed_streak, 0);
        assert_eq!(store.get_u32(keys::COMPLETED_STREAK), Some(0));
    }

    #[test]
    fn test_evaluate_streak_increments_once_per_day() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);
        acc.check_new_day(&mut store, day(10));

        assert!(!acc.evaluate_streak(&mut store, 4, day(10)));
        assert!(acc.evaluate_streak(&mut store, 5, day(10)));
        assert_eq!(acc.completed_streak, 1);

        // Goal still met, same day: no second increment.
        assert!(!acc.evaluate_streak(&mut store, 9, day(10)));
        assert_eq!(acc.completed_streak, 1);

        assert!(acc.evaluate_streak(&mut store, 5, day(11)));
        assert_eq!(acc.completed_streak, 2);
    }

    #[test]
    fn test_record_focus_completion_rounds_minutes() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);

        acc.record_focus_completion(&mut store, 24.6);
        acc.record_focus_completion(&mut store, 0.4);
        assert_eq!(acc.focus_sessions_today, 2);
        assert_eq!(acc.total_focus_minutes_today, 25);
    }

    #[test]
    fn test_progress_percent_clamps_at_100() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);
        acc.set_daily_goal(&mut store, 4).unwrap();

        assert_eq!(acc.progress_percent(0), 0);
        assert_eq!(acc.progress_percent(1), 25);
        assert_eq!(acc.progress_percent(3), 75);
        assert_eq!(acc.progress_percent(4), 100);
        assert_eq!(acc.progress_percent(11), 100);
    }

    #[test]
    fn test_set_daily_goal_rejects_zero() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);
        assert!(acc.set_daily_goal(&mut store, 0).is_err());
        assert_eq!(acc.daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_state_persists_across_load() {
        let (_dir, mut store) = setup();
        let mut acc = DailyAccounting::load(&store);
        acc.check_new_day(&mut store, day(10));
        acc.record_focus_completion(&mut store, 45.0);
        acc.evaluate_streak(&mut store, 5, day(10));

        let acc = DailyAccounting::load(&store);
        assert_eq!(acc.focus_sessions_today, 1);
        assert_eq!(acc.total_focus_minutes_today, 45);
        assert_eq!(acc.completed_streak, 1);
        assert_eq!(acc.last_streak_date(), Some(day(10)));
    }
}
