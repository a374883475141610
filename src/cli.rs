use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::router::Tab;
use crate::types::{FitnessLevel, Theme};

#[derive(Parser)]
#[command(name = "fitgirl", version, about = "Guided home workouts, streaks and progress")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the home screen
    #[command(visible_alias = "h")]
    Home,

    /// Jump to a tab
    Tab {
        #[arg(value_enum)]
        tab: Tab,
    },

    /// Workout-scoped commands
    #[command(subcommand, visible_alias = "w")]
    Workout(WorkoutCmd),

    /// Show totals, streak and achievements
    #[command(visible_alias = "p")]
    Progress,

    /// Show recorded workouts
    History {
        /// How many to show (defaults to `history.limit`)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Workout log maintenance
    #[command(subcommand)]
    Logs(LogsCmd),

    /// View or edit your profile
    #[command(subcommand)]
    Profile(ProfileCmd),

    /// Workout video gallery
    #[command(subcommand, visible_alias = "v")]
    Video(VideoCmd),

    /// Show, set or toggle the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCmd>,
    },

    /// View or edit fitgirl config
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Subcommand)]
pub enum WorkoutCmd {
    /// Pick a category and open its workout
    #[command(visible_alias = "s")]
    Start {
        /// Category id (core, lower-back, legs, glutes, cardio)
        category: String,
    },

    /// Show the current workout
    #[command(visible_alias = "i")]
    Show,

    /// Make an exercise the active one
    #[command(visible_alias = "b")]
    Begin {
        /// Exercise id or 1-based index
        exercise: String,
    },

    /// Complete one set of an exercise - Usage: workout set EXERCISE
    #[command(visible_alias = "d")]
    Set {
        /// Exercise id or 1-based index
        exercise: String,

        /// Don't run the rest countdown
        #[arg(long)]
        no_rest: bool,
    },

    /// Run a rest countdown
    #[command(visible_alias = "r")]
    Rest {
        /// Seconds to count down
        seconds: u32,
    },

    /// Leave the workout and go back home
    Back,
}

#[derive(Subcommand)]
pub enum LogsCmd {
    /// Delete every workout log
    Clear {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Show the profile screen
    Show,

    /// Edit profile fields
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long, value_enum)]
        level: Option<FitnessLevel>,

        #[arg(long)]
        favorite: Option<String>,
    },

    /// Upload a profile picture (image, max 5MB)
    Picture { file: PathBuf },
}

#[derive(Subcommand)]
pub enum VideoCmd {
    /// Upload a workout video (max 50MB)
    #[command(visible_alias = "u")]
    Upload {
        file: PathBuf,

        #[arg(short, long)]
        title: String,
    },

    /// List uploaded videos
    #[command(visible_alias = "l")]
    List,

    /// Delete a video by id
    #[command(visible_alias = "d")]
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ThemeCmd {
    /// Use a specific theme
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },

    /// Flip between light and dark
    Toggle,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}
