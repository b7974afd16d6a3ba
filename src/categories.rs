// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Preset category names offered when recording an entry. Entries keep
//! their category as free text, so removing a preset touches no entry.

use crate::error::{LedgerError, Result, map_unique};
use rusqlite::{Connection, params};

pub fn categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn add_category(conn: &Connection, name: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput("category name must not be empty".into()));
    }
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])
        .map_err(|e| map_unique(e, || format!("category '{}' already exists", name)))?;
    Ok(conn.last_insert_rowid())
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<()> {
    let name = name.trim();
    let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
    if n == 0 {
        return Err(LedgerError::InvalidInput(format!(
            "category '{}' does not exist",
            name
        )));
    }
    Ok(())
}
