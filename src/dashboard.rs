use chrono::{DateTime, Datelike, Local, Timelike};
use serde_json::{json, Value};

use crate::app::App;
use crate::model::{Priority, StatusFilter, TaskFilter};

const MOTIVATIONAL_MESSAGES: [&str; 10] = [
    "Ready to be productive?",
    "Let's crush your goals!",
    "Every small step counts!",
    "You've got this!",
    "Focus on progress, not perfection!",
    "Make today count!",
    "Stay focused, stay strong!",
    "Turn your dreams into plans!",
    "Success is built one task at a time!",
    "You're making progress!",
];

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning!"
    } else if hour < 17 {
        "Good Afternoon!"
    } else {
        "Good Evening!"
    }
}

/// Day-indexed pick, so the line is stable within a day.
pub fn motivation(day_of_year: u32) -> &'static str {
    MOTIVATIONAL_MESSAGES[day_of_year as usize % MOTIVATIONAL_MESSAGES.len()]
}

pub fn format_focus_time(total_minutes: u32) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "[!]",
        Priority::Medium => "[~]",
        Priority::Low => "[ ]",
    }
}

pub fn render_dashboard(app: &App, now: DateTime<Local>) -> String {
    let today = now.date_naive();
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        greeting(now.hour()),
        now.format("%A, %B %-d, %Y")
    ));
    out.push_str(&format!("{}\n\n", motivation(today.ordinal())));

    let filter = TaskFilter {
        due: Some(today),
        status: StatusFilter::Pending,
        ..Default::default()
    };
    let due_today = app.query_tasks(&filter);

    out.push_str(&format!("Today's tasks ({})\n", due_today.len()));
    if due_today.is_empty() {
        out.push_str("  No tasks for today!\n");
    } else {
        for task in &due_today {
            out.push_str(&format!(
                "  {} {} {} ({})\n",
                priority_marker(task.priority),
                task.id,
                task.title,
                task.category.name()
            ));
        }
    }

    let stats = app.task_stats(today);
    let percent = app.accounting.progress_percent(stats.completed_today as u32);
    out.push_str(&format!(
        "\nGoal: {}/{} completed today ({}%)\n",
        stats.completed_today, app.accounting.daily_goal, percent
    ));
    out.push_str(&format!("Streak: {} day(s)\n", app.accounting.completed_streak));
    out.push_str(&format!(
        "Focus: {} session(s), {}\n",
        app.accounting.focus_sessions_today,
        format_focus_time(app.accounting.total_focus_minutes_today)
    ));

    if !app.activity.is_empty() {
        out.push_str(&format!("\nRecent activity ({})\n", app.activity.len()));
        for entry in app.activity.entries() {
            out.push_str(&format!("  {}  {}\n", entry.time, entry.text));
        }
    }

    out
}

pub fn build_status(app: &App, now: DateTime<Local>) -> Value {
    let today = now.date_naive();
    let stats = app.task_stats(today);

    json!({
        "date": today.to_string(),
        "theme": app.theme.name(),
        "tasks": stats,
        "goal": {
            "daily": app.accounting.daily_goal,
            "completedToday": stats.completed_today,
            "progressPercent": app.accounting.progress_percent(stats.completed_today as u32),
        },
        "streak": app.accounting.completed_streak,
        "lastStreakDate": app.accounting.last_streak_date().map(|d| d.to_string()),
        "focus": {
            "sessionsToday": app.accounting.focus_sessions_today,
            "minutesToday": app.accounting.total_focus_minutes_today,
        },
    })
}
