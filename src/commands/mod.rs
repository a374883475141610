pub mod config;
pub mod nav;
pub mod profile;
pub mod progress;
pub mod theme;
pub mod video;
pub mod workout;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;

use crate::config::Config;
use crate::errors::AppError;
use crate::storage::{KeyValueStore, RecordStore};
use crate::types::OutputFmt;
use crate::upload::HttpStorage;

/// Everything a command handler needs. `now` is captured once per invocation.
pub struct Ctx<S> {
    pub store: RecordStore<S>,
    pub config: Config,
    pub fmt: OutputFmt,
    pub now: DateTime<Local>,
}

impl<S: KeyValueStore> Ctx<S> {
    pub fn new(store: RecordStore<S>, config: Config, fmt: OutputFmt, now: DateTime<Local>) -> Self {
        Self {
            store,
            config,
            fmt,
            now,
        }
    }

    pub fn pretty(&self) -> bool {
        self.fmt == OutputFmt::Pretty
    }

    pub fn remote_storage(&self) -> Result<HttpStorage> {
        let url = self
            .config
            .storage_url()
            .context("remote storage not configured: set `storage.url` (or FITGIRL_STORAGE_URL)")?;
        let key = self
            .config
            .storage_key()
            .context("remote storage not configured: set `storage.key` (or FITGIRL_STORAGE_KEY)")?;
        Ok(HttpStorage::new(url, key))
    }
}

/// Validation failures are the user's to fix: print them and carry on.
/// Anything else is a real error.
pub fn reject_invalid<T>(res: Result<T, AppError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_validation() => {
            println!("{} {}", "error:".red().bold(), e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
