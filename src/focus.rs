use std::io::{self, Write};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::ExecutableCommand;
use tracing::debug;

use crate::app::App;
use crate::config::FocusConfig;
use crate::error::Result;
use crate::timer::{format_clock, Completion, FocusTimer, TickOutcome, TimerMode};

enum SessionEnd {
    Completed(Completion),
    Quit,
}

/// Runs countdown sessions until the user quits or declines the follow-up
/// break. The timer itself never sees the terminal; this loop is the
/// external 1 Hz driver calling `tick()` on elapsed wall-clock seconds.
pub fn run(app: &mut App, focus_config: &FocusConfig, minutes: Option<u32>, mode: TimerMode) -> Result<()> {
    let minutes = minutes.unwrap_or(match mode {
        TimerMode::Focus => focus_config.focus_minutes,
        TimerMode::ShortBreak => focus_config.short_break_minutes,
        TimerMode::LongBreak => focus_config.long_break_minutes,
    });

    let mut timer = FocusTimer::new(minutes, mode);

    loop {
        match run_session(app, &mut timer)? {
            SessionEnd::Quit => return Ok(()),
            SessionEnd::Completed(completion) => {
                app.record_completion(&completion, Local::now());

                if completion.suggest_break {
                    println!("Focus session completed! Take a break!");
                    if crate::confirm("Ready for a 5-minute break?")? {
                        timer.set_duration(focus_config.short_break_minutes, TimerMode::ShortBreak);
                        continue;
                    }
                } else {
                    println!("Break completed! Ready to focus again?");
                }
                return Ok(());
            }
        }
    }
}

fn run_session(app: &mut App, timer: &mut FocusTimer) -> Result<SessionEnd> {
    let label = timer.mode().label();

    enable_raw_mode()?;
    io::stdout().execute(EnableFocusChange)?;
    timer.start();
    app.log_session_started(label, Local::now());

    let mut last_tick = Instant::now();
    let end = loop {
        draw(timer)?;

        // Key poll doubles as the tick cadence; ticks catch up if a poll
        // overruns a second boundary.
        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char(' ') => {
                        if timer.pause() {
                            app.log_session_paused(label, Local::now());
                        } else {
                            timer.start();
                            last_tick = Instant::now();
                            app.log_session_started(label, Local::now());
                        }
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        if timer.pause() {
                            app.log_session_paused(label, Local::now());
                        }
                        break SessionEnd::Quit;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if timer.pause() {
                            app.log_session_paused(label, Local::now());
                        }
                        break SessionEnd::Quit;
                    }
                    _ => {}
                },
                // Terminal lost focus: the screen-hidden signal.
                Event::FocusLost => {
                    if timer.interrupt() {
                        app.log_session_interrupted(label, Local::now());
                    }
                }
                _ => {}
            }
        }

        if timer.is_running() {
            let mut completed = None;
            while last_tick.elapsed() >= Duration::from_secs(1) {
                last_tick += Duration::from_secs(1);
                if let TickOutcome::Completed(c) = timer.tick() {
                    completed = Some(c);
                    break;
                }
            }
            if let Some(completion) = completed {
                break SessionEnd::Completed(completion);
            }
        } else {
            last_tick = Instant::now();
        }
    };

    io::stdout().execute(DisableFocusChange)?;
    disable_raw_mode()?;
    println!();
    debug!("session loop ended");
    Ok(end)
}

fn draw(timer: &FocusTimer) -> io::Result<()> {
    let state = if timer.is_running() { "running" } else { "paused " };
    print!(
        "\r  {}  {} / {}  [{}]  space: pause/resume · q: quit  ",
        timer.mode().label(),
        format_clock(timer.remaining_seconds()),
        format_clock(timer.duration_seconds()),
        state
    );
    io::stdout().flush()
}
