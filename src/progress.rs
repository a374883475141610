//! Derived statistics over the stored workout logs.
//!
//! Everything here is a pure function of the log list and an explicit
//! `today`, so none of it reads the wall clock.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use serde::Serialize;

use crate::catalog::CATEGORY_IDS;
use crate::models::WorkoutLog;

pub const WEEK_TARGET: usize = 7;

fn parse_date(log: &WorkoutLog) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(log.date.trim(), "%Y-%m-%d").ok()
}

pub fn total_workouts(logs: &[WorkoutLog]) -> usize {
    logs.len()
}

/// Logs from the seven days ending today, `today - 6` through `today`.
pub fn this_week_workouts(logs: &[WorkoutLog], today: NaiveDate) -> usize {
    let week_ago = today - Duration::days(7);
    logs.iter()
        .filter_map(parse_date)
        .filter(|d| *d > week_ago)
        .count()
}

/// Consecutive-day count ending today.
///
/// Logs are walked newest first. Each one extends the streak if it is at
/// most one day older than the previously accepted date (starting from
/// `today`); the first larger gap ends the walk. Several logs on the same
/// day each add one.
pub fn streak(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    let dates = logs
        .iter()
        .filter_map(parse_date)
        .sorted_by(|a, b| b.cmp(a));

    let mut streak = 0;
    let mut check = today;
    for date in dates {
        if (check - date).num_days() <= 1 {
            streak += 1;
            check = date;
        } else {
            break;
        }
    }
    streak
}

pub fn category_stats(logs: &[WorkoutLog]) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for log in logs {
        *stats.entry(log.category.clone()).or_insert(0) += 1;
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_workouts: usize,
    pub this_week_workouts: usize,
    pub streak: u32,
    pub category_stats: BTreeMap<String, usize>,
    pub achievements: Vec<Achievement>,
}

impl ProgressSummary {
    pub fn compute(logs: &[WorkoutLog], today: NaiveDate) -> Self {
        let total_workouts = total_workouts(logs);
        let this_week_workouts = this_week_workouts(logs, today);
        let streak = streak(logs, today);
        let category_stats = category_stats(logs);
        let achievements = achievements(total_workouts, this_week_workouts, streak, &category_stats);

        Self {
            total_workouts,
            this_week_workouts,
            streak,
            category_stats,
            achievements,
        }
    }

    /// Share of the weekly target reached, capped at 100.
    pub fn week_percentage(&self) -> f64 {
        (self.this_week_workouts as f64 / WEEK_TARGET as f64 * 100.0).min(100.0)
    }

    pub fn earned(&self, title: &str) -> bool {
        self.achievements.iter().any(|a| a.title == title && a.earned)
    }
}

pub fn achievements(
    total: usize,
    this_week: usize,
    streak: u32,
    category_stats: &BTreeMap<String, usize>,
) -> Vec<Achievement> {
    let every_category = CATEGORY_IDS
        .iter()
        .all(|id| category_stats.get(*id).copied().unwrap_or(0) >= 1);

    vec![
        Achievement {
            title: "First Workout",
            description: "Completed your first workout!",
            earned: total >= 1,
        },
        Achievement {
            title: "Consistent Week",
            description: "Worked out 3 times this week",
            earned: this_week >= 3,
        },
        Achievement {
            title: "Streak Master",
            description: "Maintained a 7-day streak",
            earned: streak >= 7,
        },
        Achievement {
            title: "Variety Seeker",
            description: "Tried all workout categories",
            earned: every_category,
        },
    ]
}
