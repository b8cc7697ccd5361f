use serde::Serialize;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const SHORT_BREAK_MINUTES: u32 = 5;
pub const LONG_BREAK_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Human label as it appears in activity entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Focus => "focus session",
            Self::ShortBreak => "short break",
            Self::LongBreak => "long break",
        }
    }
}

/// Emitted by `tick()` when the countdown reaches zero. Focus completions
/// feed daily accounting; breaks only produce an activity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub mode: TimerMode,
    pub minutes_elapsed: f64,
    pub suggest_break: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Idle,
    Running { remaining_seconds: u32 },
    Completed(Completion),
}

/// Countdown state machine. The 1 Hz drive is external: a scheduler calls
/// `tick()` once per elapsed wall-clock second, which keeps the machine
/// deterministic under test. Only one countdown exists per timer and
/// `remaining_seconds` is always a consistent, resumable value.
pub struct FocusTimer {
    mode: TimerMode,
    duration_seconds: u32,
    remaining_seconds: u32,
    running: bool,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            mode: TimerMode::Focus,
            duration_seconds: DEFAULT_FOCUS_MINUTES * 60,
            remaining_seconds: DEFAULT_FOCUS_MINUTES * 60,
            running: false,
        }
    }
}

impl FocusTimer {
    pub fn new(minutes: u32, mode: TimerMode) -> Self {
        let mut timer = Self::default();
        timer.set_duration(minutes, mode);
        timer
    }

    /// Silent no-op while running or for a zero duration.
    pub fn set_duration(&mut self, minutes: u32, mode: TimerMode) {
        if self.running || minutes == 0 {
            return;
        }
        self.mode = mode;
        self.duration_seconds = minutes * 60;
        self.remaining_seconds = self.duration_seconds;
    }

    /// Returns false (and changes nothing) when already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Halts the countdown; `remaining_seconds` stays resumable. Returns
    /// false when not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// External visibility signal: the view layer calls this when the
    /// session loses the screen. Returns whether a pause happened.
    pub fn interrupt(&mut self) -> bool {
        self.pause()
    }

    /// One countdown step. On reaching zero the timer resets to its full
    /// duration, stops, and reports the completed session.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            };
        }

        self.running = false;
        self.remaining_seconds = self.duration_seconds;

        TickOutcome::Completed(Completion {
            mode: self.mode,
            minutes_elapsed: f64::from(self.duration_seconds) / 60.0,
            suggest_break: self.mode == TimerMode::Focus,
        })
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// `M:SS`, or `H:MM:SS` once an hour is involved.
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
