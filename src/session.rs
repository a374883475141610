use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, Category, Exercise};
use crate::errors::AppError;
use crate::models::{ExerciseBreakdown, WorkoutLog, WorkoutSession};
use crate::storage::{KeyValueStore, RecordStore};

/// In-progress pass through one category's exercise list.
///
/// Persisted between invocations under `activeSession`. `saved` flips to
/// true the moment the completion records are produced and never back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub category: String,
    /// exercise id → sets completed so far.
    #[serde(default)]
    pub completed: BTreeMap<String, u32>,
    #[serde(default)]
    pub current_exercise: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Logged {
        completed: u32,
        prescribed: u32,
        /// Seconds of rest to count down before the next set, if any remain.
        rest: Option<u32>,
    },
    AlreadyComplete,
}

impl ActiveSession {
    pub fn new(category: &Category) -> Self {
        Self {
            category: category.id.to_string(),
            completed: BTreeMap::new(),
            current_exercise: None,
            started_at: None,
            saved: false,
        }
    }

    /// The catalog entry, or `None` if the stored id no longer exists.
    pub fn category(&self) -> Option<&'static Category> {
        catalog::category(&self.category)
    }

    fn exercises(&self) -> &'static [Exercise] {
        self.category().map(|c| c.exercises).unwrap_or(&[])
    }

    fn exercise(&self, id: &str) -> Result<&'static Exercise, AppError> {
        self.category()
            .and_then(|c| c.exercise(id))
            .ok_or_else(|| AppError::NotFound(format!("exercise `{id}` in {}", self.category)))
    }

    pub fn completed_for(&self, exercise_id: &str) -> u32 {
        self.completed.get(exercise_id).copied().unwrap_or(0)
    }

    pub fn total_sets(&self) -> u32 {
        self.category().map_or(0, Category::total_sets)
    }

    pub fn completed_sets_count(&self) -> u32 {
        self.completed.values().sum()
    }

    pub fn progress_percentage(&self) -> f64 {
        let total = self.total_sets();
        if total == 0 {
            return 0.0;
        }
        self.completed_sets_count() as f64 / total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total_sets();
        total > 0 && self.completed_sets_count() == total
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some() || self.completed_sets_count() > 0
    }

    /// Started and not yet recorded.
    pub fn is_mid_workout(&self) -> bool {
        self.is_started() && !self.saved
    }

    pub fn start_exercise(&mut self, exercise_id: &str, now: DateTime<Local>) -> Result<(), AppError> {
        let exercise = self.exercise(exercise_id)?;
        self.current_exercise = Some(exercise.id.to_string());
        self.started_at.get_or_insert(now);
        Ok(())
    }

    /// Completing a set also makes the exercise current, so the clock starts
    /// even if nobody called [`start_exercise`](Self::start_exercise) first.
    pub fn complete_set(&mut self, exercise_id: &str, now: DateTime<Local>) -> Result<SetOutcome, AppError> {
        let exercise = self.exercise(exercise_id)?;
        let current = self.completed_for(exercise.id);
        if current >= exercise.sets {
            return Ok(SetOutcome::AlreadyComplete);
        }

        self.start_exercise(exercise.id, now)?;
        let completed = (current + 1).min(exercise.sets);
        self.completed.insert(exercise.id.to_string(), completed);

        let rest = (completed < exercise.sets).then_some(exercise.rest_time);
        Ok(SetOutcome::Logged {
            completed,
            prescribed: exercise.sets,
            rest,
        })
    }

    /// Whole minutes since the first exercise was started, rounded.
    pub fn elapsed_minutes(&self, now: DateTime<Local>) -> u32 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let secs = (now - start).num_seconds().max(0);
        ((secs + 30) / 60) as u32
    }

    /// Produces the two completion records exactly once.
    ///
    /// Returns `None` until every prescribed set is done, and `None` on every
    /// call after the first one that returned records.
    pub fn take_records(&mut self, now: DateTime<Local>) -> Option<(WorkoutLog, WorkoutSession)> {
        if self.saved || !self.is_complete() {
            return None;
        }
        self.saved = true;

        let date = now.date_naive().format("%Y-%m-%d").to_string();
        let completed_sets = self.completed_sets_count();
        let total_sets = self.total_sets();

        let log = WorkoutLog {
            date: date.clone(),
            category: self.category.clone(),
            completed_sets,
            total_sets,
        };

        let session = WorkoutSession {
            id: Uuid::now_v7().to_string(),
            date,
            category: self.category.clone(),
            category_name: catalog::display_name(&self.category),
            duration: self.elapsed_minutes(now),
            timestamp: now,
            completed_sets,
            total_sets,
            exercises: self
                .exercises()
                .iter()
                .map(|e| ExerciseBreakdown {
                    exercise_id: e.id.to_string(),
                    name: e.name.to_string(),
                    completed_sets: self.completed_for(e.id),
                    total_sets: e.sets,
                })
                .collect(),
        };

        Some((log, session))
    }
}

/// Appends the completion records if this call is the one that completes the
/// session, then persists the session so the `saved` flag survives restarts.
///
/// If the append fails nothing was recorded: the session goes back to unsaved,
/// is persisted with every set intact, and the next call tries again.
pub fn record_if_complete<S: KeyValueStore>(
    store: &RecordStore<S>,
    session: &mut ActiveSession,
    now: DateTime<Local>,
) -> Result<Option<WorkoutSession>> {
    let recorded = match session.take_records(now) {
        Some((log, history)) => {
            if let Err(e) = store.append_workout(log, history.clone()) {
                session.saved = false;
                if let Err(save_err) = store.save_active_session(session) {
                    warn!("could not persist unsaved workout: {save_err:#}");
                }
                return Err(e.context("workout not recorded"));
            }
            info!(
                "recorded {} workout: {}/{} sets in {} min",
                history.category, history.completed_sets, history.total_sets, history.duration
            );
            Some(history)
        }
        None => None,
    };

    store.save_active_session(session)?;
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::storage::{FailingStore, MemoryStore, WORKOUT_HISTORY};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, h, m, s).unwrap()
    }

    fn legs() -> ActiveSession {
        ActiveSession::new(catalog::category("legs").unwrap())
    }

    fn finish_all(s: &mut ActiveSession, now: DateTime<Local>) {
        for _ in 0..3 {
            s.complete_set("squats", now).unwrap();
            s.complete_set("lunges", now).unwrap();
        }
    }

    #[test]
    fn totals_follow_catalog() {
        let mut s = legs();
        assert_eq!(s.total_sets(), 6);
        assert_eq!(s.completed_sets_count(), 0);

        s.complete_set("squats", at(9, 0, 0)).unwrap();
        assert_eq!(s.completed_sets_count(), 1);
        assert!((s.progress_percentage() - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn set_completion_clamps_and_reports_rest() {
        let mut s = legs();
        let now = at(9, 0, 0);

        assert_eq!(
            s.complete_set("squats", now).unwrap(),
            SetOutcome::Logged { completed: 1, prescribed: 3, rest: Some(60) }
        );
        s.complete_set("squats", now).unwrap();
        assert_eq!(
            s.complete_set("squats", now).unwrap(),
            SetOutcome::Logged { completed: 3, prescribed: 3, rest: None }
        );
        assert_eq!(s.complete_set("squats", now).unwrap(), SetOutcome::AlreadyComplete);
        assert_eq!(s.completed_for("squats"), 3);
    }

    #[test]
    fn unknown_exercise_is_not_found() {
        let mut s = legs();
        let err = s.complete_set("plank", at(9, 0, 0)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!s.is_started());
    }

    #[test]
    fn first_start_stamps_the_clock_once() {
        let mut s = legs();
        s.start_exercise("squats", at(9, 0, 0)).unwrap();
        s.start_exercise("lunges", at(9, 10, 0)).unwrap();
        assert_eq!(s.started_at, Some(at(9, 0, 0)));
        assert_eq!(s.current_exercise.as_deref(), Some("lunges"));
    }

    #[test]
    fn elapsed_minutes_round_to_nearest() {
        let mut s = legs();
        s.start_exercise("squats", at(9, 0, 0)).unwrap();
        assert_eq!(s.elapsed_minutes(at(9, 12, 29)), 12);
        assert_eq!(s.elapsed_minutes(at(9, 12, 30)), 13);
        assert_eq!(legs().elapsed_minutes(at(9, 0, 0)), 0);
    }

    #[test]
    fn records_only_at_full_completion() {
        let mut s = legs();
        let now = at(9, 0, 0);
        for _ in 0..3 {
            s.complete_set("squats", now).unwrap();
        }
        s.complete_set("lunges", now).unwrap();
        s.complete_set("lunges", now).unwrap();
        assert!(!s.is_complete());
        assert!(s.take_records(now).is_none());
        assert!(!s.saved);

        s.complete_set("lunges", now).unwrap();
        assert!(s.is_complete());
        assert!(s.take_records(now).is_some());
    }

    #[test]
    fn records_are_taken_at_most_once() {
        let mut s = legs();
        let start = at(9, 0, 0);
        s.start_exercise("squats", start).unwrap();
        finish_all(&mut s, start);

        let end = start + Duration::minutes(20);
        let (log, session) = s.take_records(end).unwrap();
        assert_eq!(log.date, "2024-03-10");
        assert_eq!(log.category, "legs");
        assert_eq!((log.completed_sets, log.total_sets), (6, 6));
        assert_eq!(session.duration, 20);
        assert_eq!(session.category_name, "Legs");
        assert_eq!(session.exercises.len(), 2);

        assert!(s.take_records(end).is_none());
        assert!(!s.is_mid_workout());
    }

    #[test]
    fn record_if_complete_appends_once_across_reloads() {
        let store = RecordStore::new(MemoryStore::new());
        let mut s = legs();
        let now = at(18, 0, 0);
        finish_all(&mut s, now);

        assert!(record_if_complete(&store, &mut s, now).unwrap().is_some());

        // Re-render from persisted state: nothing new is written.
        let mut reloaded = store.active_session().unwrap();
        assert!(reloaded.saved);
        assert!(record_if_complete(&store, &mut reloaded, now).unwrap().is_none());

        assert_eq!(store.workout_logs().len(), 1);
        assert_eq!(store.workout_history().len(), 1);
    }

    #[test]
    fn failed_append_keeps_the_session_for_one_retry() {
        let store = RecordStore::new(FailingStore::new());
        let mut s = legs();
        let now = at(18, 0, 0);
        finish_all(&mut s, now);

        store.kv().fail_writes_to(WORKOUT_HISTORY);
        assert!(record_if_complete(&store, &mut s, now).is_err());
        assert!(store.workout_logs().is_empty());
        assert!(store.workout_history().is_empty());

        let mut reloaded = store.active_session().unwrap();
        assert!(!reloaded.saved);
        assert_eq!(reloaded.completed_sets_count(), 6);

        store.kv().heal();
        assert!(record_if_complete(&store, &mut reloaded, now).unwrap().is_some());
        assert!(record_if_complete(&store, &mut reloaded, now).unwrap().is_none());
        assert_eq!(store.workout_logs().len(), 1);
        assert_eq!(store.workout_history().len(), 1);
    }

    #[test]
    fn stale_category_has_nothing_to_do() {
        let mut s = legs();
        s.category = "pilates".into();
        assert_eq!(s.total_sets(), 0);
        assert!(!s.is_complete());
        assert!(matches!(s.complete_set("squats", at(9, 0, 0)), Err(AppError::NotFound(_))));
        assert!(s.take_records(at(9, 0, 0)).is_none());
    }
}
