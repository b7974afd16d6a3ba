// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod entries;
pub mod goals;
pub mod history;
pub mod shell;
pub mod tags;

use crate::session::Session;
use anyhow::Result;

/// Runs one parsed command line against the session.
pub fn dispatch(session: &mut Session, matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("entry", sub)) => entries::handle(session, sub)?,
        Some(("tag", sub)) => tags::handle(session, sub)?,
        Some(("category", sub)) => categories::handle(session, sub)?,
        Some(("goal", sub)) => goals::handle(session, sub)?,
        Some(("undo", _)) => history::undo(session)?,
        Some(("redo", _)) => history::redo(session)?,
        Some(("history", _)) => history::show(session)?,
        _ => {}
    }
    Ok(())
}
