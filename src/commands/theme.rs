use anyhow::Result;
use colored::Colorize;

use crate::cli::ThemeCmd;
use crate::storage::KeyValueStore;

use super::Ctx;

pub fn handle<S: KeyValueStore>(action: Option<ThemeCmd>, ctx: &Ctx<S>) -> Result<()> {
    let current = ctx.store.theme();
    let next = match action {
        None => {
            println!("{}", current);
            return Ok(());
        }
        Some(ThemeCmd::Set { theme }) => theme,
        Some(ThemeCmd::Toggle) => current.toggled(),
    };

    ctx.store.save_theme(next)?;
    let icon = match next {
        crate::types::Theme::Dark => "🌙",
        crate::types::Theme::Light => "☀️",
    };
    println!("{} theme set to {} {}", "info:".blue().bold(), next.to_string().green(), icon);
    Ok(())
}
