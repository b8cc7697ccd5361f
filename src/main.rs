use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::{CommandFactory, Parser};
use tracing::info;

mod accounting;
mod activity;
mod app;
mod cli;
mod config;
mod dashboard;
mod error;
mod focus;
mod model;
mod repo;
mod snapshot;
mod store;
mod timer;

use app::App;
use cli::{Cli, Command};
use config::Config;
use error::Result;
use model::{NewTask, TaskFilter, Theme};
use store::Store;

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting benkyo");

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(1);
        }
    };

    // TTY = dashboard, non-TTY = machine-readable status
    let is_tty = atty::is(atty::Stream::Stdout);
    let command = cli.command.unwrap_or_else(|| {
        if is_tty {
            Command::Dashboard
        } else {
            Command::Status
        }
    });

    match run(command, config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn run(command: Command, config: Config) -> Result<()> {
    if let Command::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    if let Command::Config = &command {
        let config_toml = toml::to_string_pretty(&config)
            .map_err(|e| error::BenkyoError::Config(format!("Failed to serialize config: {}", e)))?;
        println!("{}", config_toml);
        return Ok(());
    }

    let now = Local::now();
    let today = now.date_naive();
    let default_theme = Theme::parse(&config.general.theme).unwrap_or_default();
    let mut app = App::init(Store::open(config.storage.state_path()), default_theme, now);

    match command {
        Command::Dashboard => {
            if app.evaluate_streak(today) && app.accounting.completed_streak > 1 {
                println!("🔥 {} day streak! Keep it up!", app.accounting.completed_streak);
            }
            print!("{}", dashboard::render_dashboard(&app, now));
        }
        Command::Status => {
            app.evaluate_streak(today);
            let status = dashboard::build_status(&app, now);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Add {
            title,
            category,
            priority,
            due,
            description,
        } => {
            // Quick-add defaults unless the full form overrides them.
            let mut new_task = NewTask::quick(title.join(" "), today);
            if let Some(category) = category {
                new_task.category = category;
            }
            if let Some(priority) = priority {
                new_task.priority = priority;
            }
            if let Some(due) = due {
                new_task.due_date = due;
            }
            if let Some(description) = description {
                new_task.description = description;
            }
            let task = app.add_task(new_task, now)?;
            println!("✓ Created task: {} (ID: {})", task.title, task.id);
        }
        Command::List {
            due,
            priority,
            status,
            search,
            month,
            format,
        } => {
            let filter = TaskFilter {
                due,
                priority,
                status,
                search,
                month_range: month.as_deref().map(parse_month).transpose()?,
            };

            let tasks = app.query_tasks(&filter);

            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&tasks)?;
                    println!("{}", json);
                }
                _ => {
                    if tasks.is_empty() {
                        println!("No tasks found.");
                    } else {
                        for task in tasks {
                            let icon = if task.completed { "✓" } else { "☐" };
                            let priority_str = match task.priority {
                                model::Priority::High => " [!]",
                                _ => "",
                            };
                            println!(
                                "{} {} {} (due {}){}",
                                icon, task.id, task.title, task.due_date, priority_str
                            );
                        }
                    }
                }
            }
        }
        Command::Complete { id } => {
            let outcome = app.complete_task(id, now)?;
            println!("✓ Completed: {}", outcome.task.title);
            if outcome.streak_incremented && outcome.streak > 1 {
                println!("🔥 {} day streak! Keep it up!", outcome.streak);
            }
        }
        Command::Delete { id, yes } => {
            if !yes {
                let description = app.request_delete(id)?;
                if !confirm(&description)? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let task = app.delete_task(id, now)?;
            println!("Deleted task: {}", task.title);
        }
        Command::Focus { minutes, mode } => {
            focus::run(&mut app, &config.focus, minutes, mode)?;
        }
        Command::Stats => {
            let stats = app.task_stats(today);
            println!("Tasks: {} total, {} pending, {} completed", stats.total, stats.pending, stats.completed);
            println!("Today: {} due, {} completed, {} overdue overall", stats.due_today, stats.completed_today, stats.overdue);
            println!(
                "Goal: {}/{} ({}%)",
                stats.completed_today,
                app.accounting.daily_goal,
                app.accounting.progress_percent(stats.completed_today as u32)
            );
            println!("Streak: {} day(s)", app.accounting.completed_streak);
            println!(
                "Focus today: {} session(s), {}",
                app.accounting.focus_sessions_today,
                dashboard::format_focus_time(app.accounting.total_focus_minutes_today)
            );
        }
        Command::Log { clear } => {
            if clear {
                app.clear_activity();
                println!("Activity history cleared");
            } else if app.activity.is_empty() {
                println!("No recent activity");
            } else {
                for entry in app.activity.entries() {
                    println!("{}  {}", entry.time, entry.text);
                }
            }
        }
        Command::Goal { goal } => {
            app.set_daily_goal(goal)?;
            println!("Daily goal set to {}", goal);
        }
        Command::Theme { theme } => {
            let theme = match theme.as_deref() {
                Some(name) => Theme::parse(name).ok_or_else(|| {
                    error::BenkyoError::Validation(format!("unknown theme '{}'", name))
                })?,
                None => app.theme.toggled(),
            };
            app.set_theme(theme, now);
            println!("Theme: {}", app.theme.name());
        }
        Command::Export { output } => {
            let snapshot = app.export_snapshot(now);
            let json = snapshot.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Import { file, yes } => {
            let payload = std::fs::read_to_string(&file)?;
            let snapshot = app.preview_import(&payload)?;
            if !yes {
                let prompt = format!(
                    "This will replace your current data with {}. Continue?",
                    snapshot.describe()
                );
                if !confirm(&prompt)? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            app.apply_import(snapshot, now);
            println!("Data imported successfully!");
        }
        // Handled before the store is opened.
        Command::Config | Command::Completions { .. } => unreachable!(),
    }

    app.flush();
    Ok(())
}

/// "YYYY-MM" → inclusive first/last day of that month.
fn parse_month(month: &str) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let start = chrono::NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| error::BenkyoError::Validation(format!("invalid month '{}'", month)))?;
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| error::BenkyoError::Validation(format!("invalid month '{}'", month)))?;
    Ok((start, end))
}
