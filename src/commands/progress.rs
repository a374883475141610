use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::cli::LogsCmd;
use crate::progress::ProgressSummary;
use crate::storage::KeyValueStore;
use crate::types::emit;
use crate::view;

use super::Ctx;

pub fn show<S: KeyValueStore>(ctx: &Ctx<S>) -> Result<()> {
    let logs = ctx.store.workout_logs();
    let summary = ProgressSummary::compute(&logs, ctx.now.date_naive());
    let theme = ctx.store.theme();
    emit(ctx.fmt, &summary, |s| print!("{}", view::progress(s, theme)))
}

pub fn history<S: KeyValueStore>(limit: Option<usize>, ctx: &Ctx<S>) -> Result<()> {
    let history = ctx.store.workout_history();
    let limit = limit.unwrap_or_else(|| ctx.config.history_limit());
    let recent = &history[history.len().saturating_sub(limit)..];
    emit(ctx.fmt, &recent, |s| print!("{}", view::history(s)))
}

pub fn handle_logs<S: KeyValueStore>(cmd: LogsCmd, ctx: &Ctx<S>) -> Result<()> {
    match cmd {
        LogsCmd::Clear { yes } => {
            let count = ctx.store.workout_logs().len();
            if !yes {
                println!(
                    "{} this deletes {} workout logs; re-run with `--yes` to confirm",
                    "warning:".yellow().bold(),
                    count
                );
                return Ok(());
            }
            ctx.store.clear_workout_logs()?;
            info!("cleared {count} workout logs");
            println!("{} cleared {} workout logs", "ok:".green().bold(), count);
            Ok(())
        }
    }
}
