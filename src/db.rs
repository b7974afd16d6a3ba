// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::models::DEFAULT_CATEGORY;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_FILE: &str = "ledger.sqlite";

const PRESET_CATEGORIES: [&str; 5] = ["Stock", "Fund", "Bond", "FX", DEFAULT_CATEGORY];

/// `<data_dir>/<profile>/ledger.sqlite`; the profile directory is created.
pub fn db_path(config: &Config) -> Result<PathBuf> {
    let dir = config.profile_dir();
    fs::create_dir_all(&dir).map_err(|source| LedgerError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir.join(DB_FILE))
}

pub fn open(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS entries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        category TEXT NOT NULL,
        subject TEXT NOT NULL CHECK(length(trim(subject)) > 0),
        quantity TEXT NOT NULL DEFAULT '0',
        unit_price TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        profit_loss TEXT NOT NULL DEFAULT '0',
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);

    CREATE TABLE IF NOT EXISTS tags(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL DEFAULT '#cccccc',
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS entry_tags(
        entry_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        PRIMARY KEY(entry_id, tag_id),
        FOREIGN KEY(entry_id) REFERENCES entries(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_entry_tags_tag ON entry_tags(tag_id);

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    -- monthly targets; a yearly goal is the sum of its twelve months
    CREATE TABLE IF NOT EXISTS budget_goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        amount TEXT NOT NULL,
        UNIQUE(year, month)
    );
    "#,
    )?;

    let tx = conn.transaction()?;
    {
        let mut seed = tx.prepare_cached("INSERT OR IGNORE INTO categories(name) VALUES (?1)")?;
        for name in PRESET_CATEGORIES {
            seed.execute(params![name])?;
        }
    }
    tx.commit()?;
    Ok(())
}
