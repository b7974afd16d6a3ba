// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the ledger core.
///
/// Repository errors travel unchanged through the history log; the log only
/// adds `NothingToUndo` / `NothingToRedo`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{what} #{id} not found")]
    NotFound { what: &'static str, id: i64 },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub fn entry_not_found(id: i64) -> Self {
        LedgerError::NotFound { what: "Entry", id }
    }

    pub fn tag_not_found(id: i64) -> Self {
        LedgerError::NotFound { what: "Tag", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

/// Turns a UNIQUE violation into `Conflict`, anything else into `Storage`.
pub(crate) fn map_unique(err: rusqlite::Error, conflict: impl FnOnce() -> String) -> LedgerError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return LedgerError::Conflict(conflict());
        }
    }
    LedgerError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn unique_violation_becomes_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t(name TEXT UNIQUE); INSERT INTO t VALUES('a');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES('a')", [])
            .map_err(|e| map_unique(e, || "dup".into()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(ref m) if m == "dup"));
    }

    #[test]
    fn other_failures_stay_storage() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .execute("INSERT INTO missing VALUES(1)", [])
            .map_err(|e| map_unique(e, || "dup".into()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
