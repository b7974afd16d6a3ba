// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn undo(session: &mut Session) -> Result<()> {
    let done = session.undo()?;
    println!("Undid {} of entry #{}", done.kind, done.entry_id);
    Ok(())
}

pub fn redo(session: &mut Session) -> Result<()> {
    let done = session.redo()?;
    println!("Redid {} of entry #{}", done.kind, done.entry_id);
    Ok(())
}

pub fn show(session: &Session) -> Result<()> {
    let h = session.history();
    let rows: Vec<Vec<String>> = h
        .undo_items()
        .enumerate()
        .map(|(i, p)| vec![(i + 1).to_string(), p.kind.to_string(), p.entry_id.to_string()])
        .collect();
    println!("{}", pretty_table(&["#", "Change", "Entry"], rows));
    if let Some(next) = h.peek_redo() {
        println!(
            "{} change(s) can be redone, next: {} of entry #{}",
            h.redo_depth(),
            next.kind,
            next.entry_id
        );
    }
    Ok(())
}
