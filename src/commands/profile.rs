use anyhow::Result;
use colored::Colorize;

use crate::cli::ProfileCmd;
use crate::errors::AssetKind;
use crate::storage::KeyValueStore;
use crate::types::emit;
use crate::upload::{self, LocalFile};
use crate::view;

use super::{Ctx, reject_invalid};

pub fn show<S: KeyValueStore>(ctx: &Ctx<S>) -> Result<()> {
    let profile = ctx.store.profile();
    let total = ctx.store.workout_logs().len();
    let theme = ctx.store.theme();
    let today = ctx.now.date_naive();
    emit(ctx.fmt, &profile, |p| print!("{}", view::profile(p, total, today, theme)))
}

pub async fn handle<S: KeyValueStore>(cmd: ProfileCmd, ctx: &Ctx<S>) -> Result<()> {
    match cmd {
        ProfileCmd::Show => show(ctx),

        ProfileCmd::Set { name, goal, level, favorite } => {
            if name.is_none() && goal.is_none() && level.is_none() && favorite.is_none() {
                println!(
                    "{} nothing to change, pass --name, --goal, --level or --favorite",
                    "warning:".yellow().bold()
                );
                return Ok(());
            }

            let mut profile = ctx.store.profile();
            if let Some(n) = name {
                profile.name = n.trim().to_string();
            }
            if let Some(g) = goal {
                profile.goal = g.trim().to_string();
            }
            if let Some(l) = level {
                profile.level = l;
            }
            if let Some(f) = favorite {
                profile.favorite_workout = f.trim().to_string();
            }
            ctx.store.save_profile(&profile)?;
            println!("{} profile saved", "ok:".green().bold());
            Ok(())
        }

        ProfileCmd::Picture { file } => {
            let Some(local) = reject_invalid(LocalFile::read(&file, AssetKind::ProfilePicture).await)? else {
                return Ok(());
            };
            let storage = ctx.remote_storage()?;
            let uploaded = upload::upload_profile_picture(&ctx.store, &storage, local).await;
            if let Some(p) = reject_invalid(uploaded)? {
                println!(
                    "{} profile picture updated: {}",
                    "ok:".green().bold(),
                    p.profile_picture.unwrap_or_default()
                );
            }
            Ok(())
        }
    }
}
