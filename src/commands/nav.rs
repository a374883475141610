use anyhow::Result;
use log::debug;

use crate::catalog;
use crate::router::{Screen, Tab};
use crate::session::ActiveSession;
use crate::storage::KeyValueStore;
use crate::view;

use super::{Ctx, profile, progress, workout};

/// Tab switch, then render whatever the router now points at.
pub fn select_tab<S: KeyValueStore>(tab: Tab, ctx: &Ctx<S>) -> Result<()> {
    let store = &ctx.store;
    let active = store.active_session();
    let mid_workout = active.as_ref().is_some_and(ActiveSession::is_mid_workout);

    let mut router = store.router();
    router.select_tab(tab, mid_workout);
    if router.category.is_none() && active.is_some() {
        debug!("dropping idle workout on tab switch");
        store.clear_active_session()?;
    }
    store.save_router(&router)?;

    if ctx.pretty() {
        println!("{}\n", view::nav_bar(router.tab, store.theme()));
    }

    match router.screen() {
        Screen::Home => home(ctx),
        Screen::Workout(category) => {
            let session = store
                .active_session()
                .or_else(|| catalog::category(&category).map(ActiveSession::new));
            match session {
                Some(s) => workout::show(ctx, &s),
                None => home(ctx),
            }
        }
        Screen::Progress => progress::show(ctx),
        Screen::Profile => profile::show(ctx),
    }
}

pub fn home<S: KeyValueStore>(ctx: &Ctx<S>) -> Result<()> {
    if ctx.pretty() {
        print!("{}", view::home(ctx.now.date_naive(), ctx.store.theme()));
    } else {
        println!("{}", serde_json::to_string_pretty(catalog::CATEGORIES)?);
    }
    Ok(())
}
