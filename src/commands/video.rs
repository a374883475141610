use anyhow::Result;
use colored::Colorize;

use crate::cli::VideoCmd;
use crate::errors::AssetKind;
use crate::storage::KeyValueStore;
use crate::types::emit;
use crate::upload::{self, LocalFile};
use crate::utils::format_file_size;
use crate::view;

use super::{Ctx, reject_invalid};

pub async fn handle<S: KeyValueStore>(cmd: VideoCmd, ctx: &Ctx<S>) -> Result<()> {
    match cmd {
        VideoCmd::Upload { file, title } => {
            let Some(local) = reject_invalid(LocalFile::read(&file, AssetKind::WorkoutVideo).await)? else {
                return Ok(());
            };
            let storage = ctx.remote_storage()?;
            let uploaded = upload::upload_video(&ctx.store, &storage, &title, local, ctx.now).await;
            if let Some(v) = reject_invalid(uploaded)? {
                println!(
                    "{} uploaded \"{}\" ({})",
                    "ok:".green().bold(),
                    v.title,
                    format_file_size(v.size)
                );
            }
            Ok(())
        }

        VideoCmd::List => {
            let videos = ctx.store.videos();
            emit(ctx.fmt, &videos, |v| print!("{}", view::videos(v)))
        }

        VideoCmd::Delete { id } => {
            if ctx.store.delete_video(&id)? {
                println!("{} video deleted", "ok:".green().bold());
            } else {
                println!("{} no video with id `{}`", "warning:".yellow().bold(), id);
            }
            Ok(())
        }
    }
}
