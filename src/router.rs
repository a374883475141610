use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    Workouts,
    Progress,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Workouts, Tab::Progress, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Workouts => "Workouts",
            Self::Progress => "Progress",
            Self::Profile => "Profile",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_ascii_lowercase())
    }
}

/// What ends up on screen for a given router state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Workout(String),
    Progress,
    Profile,
}

/// Four-tab navigation with one level of drill-down (category → workout).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Router {
    pub tab: Tab,
    pub category: Option<String>,
}

impl Router {
    pub fn select_category(&mut self, category: &str) {
        self.category = Some(category.to_string());
        self.tab = Tab::Workouts;
    }

    pub fn back(&mut self) {
        self.category = None;
        self.tab = Tab::Home;
    }

    /// Jumps to `tab`. The selected category survives only while a workout
    /// is underway.
    pub fn select_tab(&mut self, tab: Tab, mid_workout: bool) {
        if !mid_workout {
            self.category = None;
        }
        self.tab = tab;
    }

    /// The workouts tab without a category falls back to the category picker
    /// on the home screen.
    pub fn screen(&self) -> Screen {
        match (self.tab, &self.category) {
            (Tab::Home, _) => Screen::Home,
            (Tab::Workouts, Some(c)) => Screen::Workout(c.clone()),
            (Tab::Workouts, None) => Screen::Home,
            (Tab::Progress, _) => Screen::Progress,
            (Tab::Profile, _) => Screen::Profile,
        }
    }
}
