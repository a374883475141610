use anyhow::Result;
use chrono::Local;
use clap::Parser;
use env_logger::Env;

use fitgirl::cli::{Cli, Commands};
use fitgirl::commands::{self, Ctx};
use fitgirl::config::Config;
use fitgirl::router::Tab;
use fitgirl::storage::{FileStore, RecordStore};
use fitgirl::types::OutputFmt;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("FITGIRL_LOG", "warn")).init();

    let cli = Cli::parse();

    // Config edits must work even when the data dir is broken.
    let cmd = match cli.cmd {
        Commands::Config(cmd) => return commands::config::handle(cmd),
        other => other,
    };

    let config = Config::load(&Config::default_path()?)?;
    let store = RecordStore::new(FileStore::open(config.data_dir()?)?);
    log::debug!("data dir: {}", store.kv().dir().display());
    let ctx = Ctx::new(store, config, OutputFmt::from_flag(cli.json), Local::now());

    match cmd {
        Commands::Home => commands::nav::select_tab(Tab::Home, &ctx)?,
        Commands::Tab { tab } => commands::nav::select_tab(tab, &ctx)?,
        Commands::Workout(cmd) => commands::workout::handle(cmd, &ctx).await?,
        Commands::Progress => commands::nav::select_tab(Tab::Progress, &ctx)?,
        Commands::History { limit } => commands::progress::history(limit, &ctx)?,
        Commands::Logs(cmd) => commands::progress::handle_logs(cmd, &ctx)?,
        Commands::Profile(cmd) => commands::profile::handle(cmd, &ctx).await?,
        Commands::Video(cmd) => commands::video::handle(cmd, &ctx).await?,
        Commands::Theme { action } => commands::theme::handle(action, &ctx)?,
        Commands::Config(_) => {}
    }

    Ok(())
}
