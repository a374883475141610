use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::types::FitnessLevel;

/// Flat record of one finished workout, stored under `workoutLogs`.
/// `date` is the calendar day (YYYY-MM-DD) the session happened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub date: String,
    pub category: String,
    pub completed_sets: u32,
    pub total_sets: u32,
}

/// Richer history entry, stored under `userWorkoutHistory`.
/// Written once at completion and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub date: String,
    pub category: String,
    pub category_name: String,
    /// Whole minutes between the first exercise start and completion.
    pub duration: u32,
    pub timestamp: DateTime<Local>,
    pub completed_sets: u32,
    pub total_sets: u32,
    pub exercises: Vec<ExerciseBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseBreakdown {
    pub exercise_id: String,
    pub name: String,
    pub completed_sets: u32,
    pub total_sets: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub goal: String,
    pub level: FitnessLevel,
    pub favorite_workout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutVideo {
    pub id: String,
    pub title: String,
    pub url: String,
    pub upload_date: String,
    /// Bytes.
    pub size: u64,
}
