use std::io::{IsTerminal, Write};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use log::debug;
use tokio::sync::mpsc;

use crate::utils::{format_clock, progress_bar};

/// Countdown state, advanced one second per [`tick`](Countdown::tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            running: true,
        }
    }

    /// Replaces whatever was counting with a fresh, running timer.
    pub fn reset(&mut self, duration: u32) {
        *self = Self::new(duration);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_done() {
            self.running = !self.running;
        }
    }

    pub fn skip(&mut self) {
        self.remaining = 0;
        self.running = false;
    }

    /// Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.duration == 0 {
            return 100.0;
        }
        (self.duration - self.remaining) as f64 / self.duration as f64 * 100.0
    }
}

/// Keyboard control typed while a countdown runs, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Empty line or `p`.
    Pause,
    Skip,
    Restart,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "p" => Some(Self::Pause),
            "s" => Some(Self::Skip),
            "r" => Some(Self::Restart),
            _ => None,
        }
    }

    pub fn apply(self, countdown: &mut Countdown, seconds: u32) {
        match self {
            Self::Pause => countdown.toggle_pause(),
            Self::Skip => countdown.skip(),
            Self::Restart => countdown.reset(seconds),
        }
    }
}

/// The single status line for `countdown`.
pub fn status_line(title: &str, countdown: &Countdown) -> String {
    let state = if countdown.is_running() || countdown.is_done() {
        String::new()
    } else {
        " (paused)".yellow().to_string()
    };
    format!(
        "{} {} {}{}",
        format!("{title}:").cyan().bold(),
        format_clock(countdown.remaining()).bold(),
        progress_bar(countdown.progress_percentage(), Some(20)).green(),
        state
    )
}

/// Lines from stdin, read on a plain thread so a pending read never holds up exit.
fn keyboard() -> Option<mpsc::UnboundedReceiver<String>> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    Some(rx)
}

/// Counts down in place on the terminal, one line rewritten every second.
/// On a terminal, Enter pauses or resumes, `s` skips and `r` restarts.
pub async fn run(title: &str, seconds: u32) -> Result<()> {
    let mut countdown = Countdown::new(seconds);
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // First tick completes immediately.
    interval.tick().await;

    let mut keys = keyboard();
    if keys.is_some() {
        println!("{}", "[enter] pause/resume  [s] skip  [r] restart".dimmed());
    }

    let mut out = std::io::stdout();
    loop {
        write!(out, "\r\x1b[2K{}", status_line(title, &countdown))?;
        out.flush()?;

        if countdown.is_done() {
            break;
        }

        let Some(rx) = keys.as_mut() else {
            interval.tick().await;
            countdown.tick();
            continue;
        };

        let typed = tokio::select! {
            _ = interval.tick() => {
                countdown.tick();
                continue;
            }
            line = rx.recv() => line,
        };

        let Some(line) = typed else {
            keys = None;
            continue;
        };
        match Control::parse(&line) {
            Some(control) => {
                debug!("countdown control: {control:?}");
                control.apply(&mut countdown, seconds);
            }
            None => debug!("ignoring countdown input {line:?}"),
        }
        // The typed line moved the cursor down; redraw over it.
        write!(out, "\x1b[1A")?;
    }
    println!("\n{} rest over, next set!", "ok:".green().bold());
    Ok(())
}
