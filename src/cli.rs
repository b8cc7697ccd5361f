use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::model::{Category, Priority, StatusFilter};
use crate::timer::TimerMode;

#[derive(Parser)]
#[command(name = "benkyo")]
#[command(about = "勉強 — study tasks and focus sessions in your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: ~/.config/benkyo/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show today's overview (default in a terminal)
    Dashboard,

    /// Print machine-readable state as JSON (default when piped)
    Status,

    /// Add a task
    Add {
        /// Task title
        title: Vec<String>,

        /// Category (default: other)
        #[arg(short, long, value_enum)]
        category: Option<Category>,

        /// Priority (default: medium)
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        due: Option<chrono::NaiveDate>,

        #[arg(long)]
        description: Option<String>,
    },

    /// List tasks
    List {
        /// Only tasks due on this exact date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<chrono::NaiveDate>,

        /// Only tasks with this priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        #[arg(short, long, value_enum, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive search over title, description and category
        #[arg(long)]
        search: Option<String>,

        /// Only tasks due within a month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Mark a task completed
    Complete {
        id: i64,
    },

    /// Delete a task (asks for confirmation unless --yes)
    Delete {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Run a focus session or break with a live countdown
    Focus {
        /// Session length in minutes (default from config per mode)
        #[arg(short, long)]
        minutes: Option<u32>,

        #[arg(long, value_enum, default_value = "focus")]
        mode: TimerMode,
    },

    /// Show task and focus statistics
    Stats,

    /// Show the recent activity log
    Log {
        /// Clear the log instead
        #[arg(long)]
        clear: bool,
    },

    /// Set the daily completion goal
    Goal {
        goal: u32,
    },

    /// Set the theme (dark|light), or toggle it with no argument
    Theme {
        theme: Option<String>,
    },

    /// Export a backup snapshot as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a snapshot, replacing current state (asks unless --yes)
    Import {
        file: PathBuf,

        #[arg(short, long)]
        yes: bool,
    },

    /// Print the active config (resolved, with defaults)
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
