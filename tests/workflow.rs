use std::cell::Cell;

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Local, TimeZone};
use fitgirl::catalog;
use fitgirl::cli::{LogsCmd, ThemeCmd, WorkoutCmd};
use fitgirl::commands::{self, Ctx};
use fitgirl::config::Config;
use fitgirl::progress::ProgressSummary;
use fitgirl::router::{Screen, Tab};
use fitgirl::session::{self, ActiveSession};
use fitgirl::storage::{FileStore, KeyValueStore, MemoryStore, RecordStore, WORKOUT_HISTORY};
use fitgirl::types::{OutputFmt, Theme};

fn morning() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
}

fn ctx_at<S: KeyValueStore>(kv: S, now: DateTime<Local>) -> Ctx<S> {
    Ctx::new(RecordStore::new(kv), Config::default(), OutputFmt::Json, now)
}

/// Refuses history writes while `broken` is set.
#[derive(Default)]
struct BrokenHistory {
    inner: MemoryStore,
    broken: Cell<bool>,
}

impl KeyValueStore for BrokenHistory {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.broken.get() && key == WORKOUT_HISTORY {
            bail!("no space left on device");
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

fn set(exercise: &str) -> WorkoutCmd {
    WorkoutCmd::Set {
        exercise: exercise.to_string(),
        no_rest: true,
    }
}

#[tokio::test]
async fn finishing_every_set_records_one_workout() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "Legs".into() }, &ctx)
        .await
        .unwrap();
    assert_eq!(ctx.store.router().screen(), Screen::Workout("legs".into()));

    for exercise in ["1", "2"] {
        for _ in 0..3 {
            commands::workout::handle(set(exercise), &ctx).await.unwrap();
        }
    }

    let logs = ctx.store.workout_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].category, "legs");
    assert_eq!(logs[0].date, "2024-03-10");
    assert_eq!((logs[0].completed_sets, logs[0].total_sets), (6, 6));

    let history = ctx.store.workout_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category_name, "Legs");
    assert_eq!(history[0].exercises.len(), 2);

    // Re-rendering and extra taps on a finished workout record nothing new.
    commands::workout::handle(WorkoutCmd::Show, &ctx).await.unwrap();
    commands::workout::handle(set("1"), &ctx).await.unwrap();
    assert_eq!(ctx.store.workout_logs().len(), 1);
    assert_eq!(ctx.store.workout_history().len(), 1);
}

#[tokio::test]
async fn failed_save_is_retried_once_on_the_next_set() {
    let ctx = ctx_at(BrokenHistory::default(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "legs".into() }, &ctx)
        .await
        .unwrap();
    for _ in 0..3 {
        commands::workout::handle(set("1"), &ctx).await.unwrap();
    }
    for _ in 0..2 {
        commands::workout::handle(set("2"), &ctx).await.unwrap();
    }

    ctx.store.kv().broken.set(true);
    assert!(commands::workout::handle(set("2"), &ctx).await.is_err());
    assert!(ctx.store.workout_logs().is_empty());
    assert!(ctx.store.workout_history().is_empty());

    let session = ctx.store.active_session().unwrap();
    assert_eq!(session.completed_sets_count(), 6);
    assert!(!session.saved);

    ctx.store.kv().broken.set(false);
    commands::workout::handle(set("2"), &ctx).await.unwrap();
    commands::workout::handle(set("2"), &ctx).await.unwrap();
    assert_eq!(ctx.store.workout_logs().len(), 1);
    assert_eq!(ctx.store.workout_history().len(), 1);
}

#[tokio::test]
async fn partial_workout_records_nothing() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "core".into() }, &ctx)
        .await
        .unwrap();
    for _ in 0..3 {
        commands::workout::handle(set("1"), &ctx).await.unwrap();
    }

    assert!(ctx.store.workout_logs().is_empty());
    let session = ctx.store.active_session().unwrap();
    assert_eq!(session.completed_sets_count(), 3);
    assert!(session.is_mid_workout());
}

#[tokio::test]
async fn unknown_category_starts_nothing() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "yoga".into() }, &ctx)
        .await
        .unwrap();

    assert!(ctx.store.active_session().is_none());
    assert_eq!(ctx.store.router().screen(), Screen::Home);
}

#[tokio::test]
async fn tab_switch_keeps_a_workout_that_is_underway() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "glutes".into() }, &ctx)
        .await
        .unwrap();
    commands::workout::handle(set("1"), &ctx).await.unwrap();

    commands::nav::select_tab(Tab::Progress, &ctx).unwrap();
    assert_eq!(ctx.store.router().category.as_deref(), Some("glutes"));

    commands::nav::select_tab(Tab::Workouts, &ctx).unwrap();
    assert_eq!(ctx.store.router().screen(), Screen::Workout("glutes".into()));
    assert_eq!(ctx.store.active_session().unwrap().completed_for("glute-bridges"), 1);
}

#[tokio::test]
async fn tab_switch_drops_an_idle_workout() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "cardio".into() }, &ctx)
        .await
        .unwrap();
    commands::nav::select_tab(Tab::Profile, &ctx).unwrap();

    let router = ctx.store.router();
    assert_eq!(router.tab, Tab::Profile);
    assert!(router.category.is_none());
    assert!(ctx.store.active_session().is_none());
}

#[tokio::test]
async fn back_returns_home_and_forgets_the_session() {
    let ctx = ctx_at(MemoryStore::new(), morning());

    commands::workout::handle(WorkoutCmd::Start { category: "core".into() }, &ctx)
        .await
        .unwrap();
    commands::workout::handle(WorkoutCmd::Back, &ctx).await.unwrap();

    assert_eq!(ctx.store.router().screen(), Screen::Home);
    assert!(ctx.store.active_session().is_none());
}

#[test]
fn theme_toggle_persists() {
    let ctx = ctx_at(MemoryStore::new(), morning());
    assert_eq!(ctx.store.theme(), Theme::Light);

    commands::theme::handle(Some(ThemeCmd::Toggle), &ctx).unwrap();
    assert_eq!(ctx.store.theme(), Theme::Dark);

    commands::theme::handle(Some(ThemeCmd::Set { theme: Theme::Light }), &ctx).unwrap();
    assert_eq!(ctx.store.theme(), Theme::Light);
}

#[test]
fn completed_session_survives_a_restart_without_rerecording() {
    let dir = tempfile::tempdir().unwrap();
    let now = morning();

    {
        let store = RecordStore::new(FileStore::open(dir.path()).unwrap());
        let category = catalog::category("legs").unwrap();
        let mut s = ActiveSession::new(category);
        for ex in category.exercises {
            for _ in 0..ex.sets {
                s.complete_set(ex.id, now).unwrap();
            }
        }
        assert!(session::record_if_complete(&store, &mut s, now).unwrap().is_some());
    }

    let store = RecordStore::new(FileStore::open(dir.path()).unwrap());
    let mut reloaded = store.active_session().unwrap();
    assert!(reloaded.saved);
    assert!(session::record_if_complete(&store, &mut reloaded, now).unwrap().is_none());
    assert_eq!(store.workout_logs().len(), 1);
}

#[test]
fn progress_over_a_week_of_file_backed_logs() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(FileStore::open(dir.path()).unwrap());
    let today = morning();

    for (days_ago, category) in [(0, "core"), (1, "legs"), (2, "glutes"), (5, "cardio")] {
        let when = today - Duration::days(days_ago);
        let category = catalog::category(category).unwrap();
        let mut s = ActiveSession::new(category);
        for ex in category.exercises {
            for _ in 0..ex.sets {
                s.complete_set(ex.id, when).unwrap();
            }
        }
        session::record_if_complete(&store, &mut s, when).unwrap();
    }

    let summary = ProgressSummary::compute(&store.workout_logs(), today.date_naive());
    assert_eq!(summary.total_workouts, 4);
    assert_eq!(summary.this_week_workouts, 4);
    assert_eq!(summary.streak, 3);
    assert!(summary.earned("First Workout"));
    assert!(summary.earned("Consistent Week"));
    assert!(!summary.earned("Variety Seeker"));

    commands::progress::handle_logs(
        LogsCmd::Clear { yes: true },
        &Ctx::new(store, Config::default(), OutputFmt::Json, today),
    )
    .unwrap();
    let store = RecordStore::new(FileStore::open(dir.path()).unwrap());
    assert!(store.workout_logs().is_empty());
}
