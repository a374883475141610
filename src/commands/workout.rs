use anyhow::Result;
use colored::Colorize;
use log::debug;

use crate::catalog::{self, Exercise};
use crate::cli::WorkoutCmd;
use crate::session::{self, ActiveSession, SetOutcome};
use crate::storage::KeyValueStore;
use crate::types::{best_category_suggestion, canonical_category, emit};
use crate::{timer, view};

use super::Ctx;

/// Accepts an exercise id, its display name, or its 1-based position.
pub fn resolve_exercise(session: &ActiveSession, input: &str) -> Option<&'static Exercise> {
    let exercises = session.category()?.exercises;
    if let Ok(idx) = input.parse::<usize>() {
        return idx.checked_sub(1).and_then(|i| exercises.get(i));
    }
    exercises
        .iter()
        .find(|e| e.id == input || e.name.eq_ignore_ascii_case(input))
}

fn no_session() {
    println!(
        "{} no workout in progress, start one with `fitgirl workout start <CATEGORY>`",
        "warning:".yellow().bold()
    );
}

pub fn show<S: KeyValueStore>(ctx: &Ctx<S>, session: &ActiveSession) -> Result<()> {
    let theme = ctx.store.theme();
    emit(ctx.fmt, session, |s| print!("{}", view::workout(s, theme)))
}

pub async fn handle<S: KeyValueStore>(cmd: WorkoutCmd, ctx: &Ctx<S>) -> Result<()> {
    let store = &ctx.store;

    match cmd {
        WorkoutCmd::Start { category } => {
            let Some(picked) = canonical_category(&category).and_then(catalog::category) else {
                match best_category_suggestion(&category) {
                    Some(s) => println!(
                        "{} unknown category `{}`, did you mean `{}`?",
                        "error:".red().bold(),
                        category,
                        s.green()
                    ),
                    None => println!(
                        "{} unknown category `{}`, pick one of: {}",
                        "error:".red().bold(),
                        category,
                        catalog::CATEGORY_IDS.join(", ")
                    ),
                }
                return Ok(());
            };

            let session = match store.active_session() {
                Some(s) if s.category == picked.id && !s.saved => {
                    debug!("resuming {} workout", picked.id);
                    s
                }
                _ => ActiveSession::new(picked),
            };

            let mut router = store.router();
            router.select_category(picked.id);
            store.save_router(&router)?;
            store.save_active_session(&session)?;

            show(ctx, &session)
        }

        WorkoutCmd::Show => match store.active_session() {
            Some(session) => show(ctx, &session),
            None => {
                no_session();
                Ok(())
            }
        },

        WorkoutCmd::Begin { exercise } => {
            let Some(mut session) = store.active_session() else {
                no_session();
                return Ok(());
            };
            let Some(ex) = resolve_exercise(&session, &exercise) else {
                println!("{} no exercise `{}` in this workout", "error:".red().bold(), exercise);
                return Ok(());
            };

            session.start_exercise(ex.id, ctx.now)?;
            store.save_active_session(&session)?;

            if ctx.pretty() {
                println!(
                    "{} {}: {} sets of {}",
                    "go:".green().bold(),
                    ex.name.bold(),
                    ex.sets,
                    ex.reps
                );
                println!("    {} {}", "tip:".cyan(), ex.tips);
            }
            Ok(())
        }

        WorkoutCmd::Set { exercise, no_rest } => {
            let Some(mut session) = store.active_session() else {
                no_session();
                return Ok(());
            };
            let Some(ex) = resolve_exercise(&session, &exercise) else {
                println!("{} no exercise `{}` in this workout", "error:".red().bold(), exercise);
                return Ok(());
            };

            let rest = match session.complete_set(ex.id, ctx.now)? {
                SetOutcome::AlreadyComplete => {
                    println!(
                        "{} all {} sets of {} are already done",
                        "warning:".yellow().bold(),
                        ex.sets,
                        ex.name
                    );
                    None
                }
                SetOutcome::Logged { completed, prescribed, rest } => {
                    if ctx.pretty() {
                        println!(
                            "{} {} set {}/{}",
                            "ok:".green().bold(),
                            ex.name.bold(),
                            completed,
                            prescribed
                        );
                    }
                    rest
                }
            };

            // Also reached on `AlreadyComplete`, so a finished session whose save
            // failed is recorded on the next tap.
            if let Some(recorded) = session::record_if_complete(store, &mut session, ctx.now)? {
                if ctx.pretty() {
                    println!(
                        "{} workout saved: {} sets in {} min",
                        "🎉".bold(),
                        recorded.completed_sets,
                        recorded.duration
                    );
                }
                return show(ctx, &session);
            }

            match rest {
                Some(secs) if !no_rest && ctx.pretty() => timer::run("Rest Time", secs).await,
                _ => Ok(()),
            }
        }

        WorkoutCmd::Rest { seconds } => timer::run("Rest Time", seconds).await,

        WorkoutCmd::Back => {
            store.clear_active_session()?;
            let mut router = store.router();
            router.back();
            store.save_router(&router)?;

            if ctx.pretty() {
                print!("{}", view::home(ctx.now.date_naive(), store.theme()));
            }
            Ok(())
        }
    }
}
