use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::catalog::CATEGORY_IDS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parses the persisted string. Anything unexpected falls back to light.
    pub fn from_stored(raw: &str) -> Self {
        match raw.trim() {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Light => "light",
            Self::Dark => "dark",
        };

        write!(f, "{}", s)
    }
}

/// Returns the canonical category id or `None` if it isn't in the catalog.
pub fn canonical_category<S: AsRef<str>>(c: S) -> Option<&'static str> {
    let c = c.as_ref().trim().to_ascii_lowercase().replace([' ', '_'], "-");
    CATEGORY_IDS.iter().copied().find(|id| *id == c)
}

/// Return the closest known category for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
pub fn best_category_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.trim().to_ascii_lowercase();
    if inp.is_empty() {
        return None;
    }

    let mut scores: Vec<(&'static str, f64)> = CATEGORY_IDS
        .iter()
        .copied()
        .map(|c| (c, jaro_winkler(&inp, c)))
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Pretty,
    Json,
}

impl OutputFmt {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Pretty }
    }
}

/// Prints `value` as JSON when asked to, otherwise hands off to the pretty printer.
pub fn emit<T: Serialize>(fmt: OutputFmt, value: &T, pretty: impl FnOnce(&T)) -> anyhow::Result<()> {
    match fmt {
        OutputFmt::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFmt::Pretty => pretty(value),
    }
    Ok(())
}
