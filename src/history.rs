// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory undo/redo log for entry mutations.
//!
//! Every committed add/update/delete pushes one [`Operation`] onto the undo
//! stack and clears the redo stack. Undo applies the inverse and moves the
//! record to the redo stack; redo re-applies the original and moves it back.
//! A failed write leaves both stacks untouched. Tag-link edits are not
//! recorded here.

use crate::error::{LedgerError, Result};
use crate::models::{EntryDraft, LedgerEntry};
use crate::records::{self, DeletedEntry};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Add => "add",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// One committed mutation, carrying enough state to invert and replay it.
///
/// Removing a row cascades its tag links, so whichever side removes it
/// (undo of `Add`, redo of `Delete`) refreshes the captured link set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Add {
        entry: LedgerEntry,
        tag_ids: Vec<i64>,
    },
    Update {
        before: LedgerEntry,
        after: LedgerEntry,
    },
    Delete(DeletedEntry),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Add { .. } => OperationKind::Add,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Delete(_) => OperationKind::Delete,
        }
    }

    pub fn entry_id(&self) -> i64 {
        match self {
            Operation::Add { entry, .. } => entry.id,
            Operation::Update { after, .. } => after.id,
            Operation::Delete(d) => d.entry.id,
        }
    }

    fn compensate(&mut self, conn: &mut Connection) -> Result<()> {
        match self {
            Operation::Add { entry, tag_ids } => {
                *tag_ids = records::delete(conn, entry.id)?.tag_ids;
                Ok(())
            }
            Operation::Update { before, .. } => records::update(conn, before).map(|_| ()),
            Operation::Delete(d) => records::restore(conn, &d.entry, &d.tag_ids),
        }
    }

    fn reapply(&mut self, conn: &mut Connection) -> Result<()> {
        match self {
            Operation::Add { entry, tag_ids } => records::restore(conn, entry, tag_ids),
            Operation::Update { after, .. } => records::update(conn, after).map(|_| ()),
            Operation::Delete(d) => {
                d.tag_ids = records::delete(conn, d.entry.id)?.tag_ids;
                Ok(())
            }
        }
    }
}

/// What the next undo or redo would touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pending {
    pub kind: OperationKind,
    pub entry_id: i64,
}

impl From<&Operation> for Pending {
    fn from(op: &Operation) -> Self {
        Pending {
            kind: op.kind(),
            entry_id: op.entry_id(),
        }
    }
}

/// The undo/redo stack pair; most recent last.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Operation>,
    redo: Vec<Operation>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    fn record(&mut self, op: Operation) {
        debug!(kind = %op.kind(), entry_id = op.entry_id(), "recorded");
        self.undo.push(op);
        self.redo.clear();
    }

    pub fn add(&mut self, conn: &mut Connection, draft: &EntryDraft) -> Result<LedgerEntry> {
        let entry = records::add(conn, draft)?;
        self.record(Operation::Add {
            entry: entry.clone(),
            tag_ids: Vec::new(),
        });
        Ok(entry)
    }

    pub fn update(&mut self, conn: &mut Connection, entry: &LedgerEntry) -> Result<LedgerEntry> {
        // the stored form, after trimming/upper-casing
        let after = LedgerEntry::from_draft(entry.id, records::normalize(&entry.to_draft())?);
        let before = records::update(conn, &after)?;
        self.record(Operation::Update {
            before,
            after: after.clone(),
        });
        Ok(after)
    }

    pub fn delete(&mut self, conn: &mut Connection, id: i64) -> Result<LedgerEntry> {
        let deleted = records::delete(conn, id)?;
        let entry = deleted.entry.clone();
        self.record(Operation::Delete(deleted));
        Ok(entry)
    }

    pub fn undo(&mut self, conn: &mut Connection) -> Result<Pending> {
        let op = self.undo.last_mut().ok_or(LedgerError::NothingToUndo)?;
        op.compensate(conn)?;
        let pending = Pending::from(&*op);
        if let Some(op) = self.undo.pop() {
            self.redo.push(op);
        }
        debug!(kind = %pending.kind, entry_id = pending.entry_id, "undone");
        Ok(pending)
    }

    pub fn redo(&mut self, conn: &mut Connection) -> Result<Pending> {
        let op = self.redo.last_mut().ok_or(LedgerError::NothingToRedo)?;
        op.reapply(conn)?;
        let pending = Pending::from(&*op);
        if let Some(op) = self.redo.pop() {
            self.undo.push(op);
        }
        debug!(kind = %pending.kind, entry_id = pending.entry_id, "redone");
        Ok(pending)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn peek_undo(&self) -> Option<Pending> {
        self.undo.last().map(Pending::from)
    }

    pub fn peek_redo(&self) -> Option<Pending> {
        self.redo.last().map(Pending::from)
    }

    /// Undo stack, oldest first.
    pub fn undo_items(&self) -> impl Iterator<Item = Pending> + '_ {
        self.undo.iter().map(Pending::from)
    }
}
