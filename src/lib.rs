//! Guided category workouts with locally stored progress.
//!
//! The binary is a thin shell over this crate: every screen is a pure render of
//! state loaded from a [`storage::RecordStore`], and every command is one state
//! transition followed by a save.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod progress;
pub mod router;
pub mod session;
pub mod storage;
pub mod timer;
pub mod types;
pub mod upload;
pub mod utils;
pub mod view;
