// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tags and the entry<->tag junction. Link operations are idempotent and
//! removal of either side cascades to `entry_tags`.

use crate::error::{LedgerError, Result, map_unique};
use crate::models::{DEFAULT_TAG_COLOR, Tag, TagPatch};
use crate::records;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;

fn from_row(r: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: r.get(0)?,
        name: r.get(1)?,
        color: r.get(2)?,
        description: r.get(3)?,
    })
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput("tag name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Blank colors fall back to the default.
fn clean_color(color: &str) -> &str {
    match color.trim() {
        "" => DEFAULT_TAG_COLOR,
        c => c,
    }
}

pub fn create_tag(
    conn: &Connection,
    name: &str,
    color: Option<&str>,
    description: Option<&str>,
) -> Result<i64> {
    let name = clean_name(name)?;
    let color = clean_color(color.unwrap_or(""));
    conn.execute(
        "INSERT INTO tags(name, color, description) VALUES (?1, ?2, ?3)",
        params![name, color, description.unwrap_or("").trim()],
    )
    .map_err(|e| map_unique(e, || format!("tag '{}' already exists", name)))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_tag(conn: &Connection, id: i64) -> Result<Tag> {
    conn.query_row(
        "SELECT id, name, color, description FROM tags WHERE id=?1",
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::tag_not_found(id))
}

pub fn tag_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>> {
    Ok(conn
        .query_row(
            "SELECT id, name, color, description FROM tags WHERE name=?1",
            params![name.trim()],
            from_row,
        )
        .optional()?)
}

fn tag_exists(conn: &Connection, id: i64) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row("SELECT 1 FROM tags WHERE id=?1", params![id], |r| r.get(0))
        .optional()?;
    Ok(hit.is_some())
}

/// Partial update; fields left `None` in the patch keep their value.
pub fn edit_tag(conn: &mut Connection, id: i64, patch: &TagPatch) -> Result<Tag> {
    let name = patch.name.as_deref().map(clean_name).transpose()?;
    let tx = conn.transaction()?;
    let current = tx
        .query_row(
            "SELECT id, name, color, description FROM tags WHERE id=?1",
            params![id],
            from_row,
        )
        .optional()?
        .ok_or_else(|| LedgerError::tag_not_found(id))?;
    let updated = Tag {
        id,
        name: name.unwrap_or(current.name),
        color: patch
            .color
            .as_deref()
            .map(|c| clean_color(c).to_string())
            .unwrap_or(current.color),
        description: patch.description.clone().unwrap_or(current.description),
    };
    tx.execute(
        "UPDATE tags SET name=?1, color=?2, description=?3 WHERE id=?4",
        params![updated.name, updated.color, updated.description, id],
    )
    .map_err(|e| map_unique(e, || format!("tag '{}' already exists", updated.name)))?;
    tx.commit()?;
    Ok(updated)
}

/// Deletes the tag; its links go with it, the entries stay.
pub fn delete_tag(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM tags WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::tag_not_found(id));
    }
    Ok(())
}

pub fn all_tags(conn: &Connection) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare("SELECT id, name, color, description FROM tags ORDER BY name")?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Substring match on name or description.
pub fn search_tags(conn: &Connection, text: &str) -> Result<Vec<Tag>> {
    let pat = records::like_pattern(text.trim());
    let mut stmt = conn.prepare(
        "SELECT id, name, color, description FROM tags
         WHERE name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
         ORDER BY name",
    )?;
    let rows = stmt.query_map(params![pat], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn ensure_pair(conn: &Connection, entry_id: i64, tag_id: i64) -> Result<()> {
    if !records::exists(conn, entry_id)? {
        return Err(LedgerError::entry_not_found(entry_id));
    }
    if !tag_exists(conn, tag_id)? {
        return Err(LedgerError::tag_not_found(tag_id));
    }
    Ok(())
}

/// Idempotent; returns whether a new link was created.
pub fn link(conn: &Connection, entry_id: i64, tag_id: i64) -> Result<bool> {
    ensure_pair(conn, entry_id, tag_id)?;
    let n = conn.execute(
        "INSERT OR IGNORE INTO entry_tags(entry_id, tag_id) VALUES (?1, ?2)",
        params![entry_id, tag_id],
    )?;
    Ok(n > 0)
}

/// Idempotent; returns whether a link was removed.
pub fn unlink(conn: &Connection, entry_id: i64, tag_id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM entry_tags WHERE entry_id=?1 AND tag_id=?2",
        params![entry_id, tag_id],
    )?;
    Ok(n > 0)
}

/// Links each tag in turn, skipping unknown tag ids; returns how many are
/// linked afterwards (new or already present). An unknown entry is an error.
pub fn link_many(conn: &Connection, entry_id: i64, tag_ids: &[i64]) -> Result<usize> {
    if !records::exists(conn, entry_id)? {
        return Err(LedgerError::entry_not_found(entry_id));
    }
    let mut ok = 0;
    for &tag_id in tag_ids {
        match link(conn, entry_id, tag_id) {
            Ok(_) => ok += 1,
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(ok)
}

pub fn unlink_many(conn: &Connection, entry_id: i64, tag_ids: &[i64]) -> Result<usize> {
    let mut removed = 0;
    for &tag_id in tag_ids {
        if unlink(conn, entry_id, tag_id)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Sets the complete tag set of one entry in a single transaction: either
/// the old set or the new set is visible, never a mix.
pub fn replace_links(conn: &mut Connection, entry_id: i64, tag_ids: &[i64]) -> Result<()> {
    let wanted: BTreeSet<i64> = tag_ids.iter().copied().collect();
    let tx = conn.transaction()?;
    if !records::exists(&tx, entry_id)? {
        return Err(LedgerError::entry_not_found(entry_id));
    }
    for &tag_id in &wanted {
        if !tag_exists(&tx, tag_id)? {
            return Err(LedgerError::tag_not_found(tag_id));
        }
    }
    tx.execute("DELETE FROM entry_tags WHERE entry_id=?1", params![entry_id])?;
    {
        let mut insert =
            tx.prepare_cached("INSERT INTO entry_tags(entry_id, tag_id) VALUES (?1, ?2)")?;
        for tag_id in &wanted {
            insert.execute(params![entry_id, tag_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn tags_for(conn: &Connection, entry_id: i64) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.color, t.description
         FROM tags t JOIN entry_tags et ON et.tag_id=t.id
         WHERE et.entry_id=?1 ORDER BY t.name",
    )?;
    let rows = stmt.query_map(params![entry_id], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn entries_for(conn: &Connection, tag_id: i64) -> Result<BTreeSet<i64>> {
    let mut stmt = conn.prepare("SELECT entry_id FROM entry_tags WHERE tag_id=?1")?;
    let rows = stmt.query_map(params![tag_id], |r| r.get::<_, i64>(0))?;
    Ok(rows.collect::<rusqlite::Result<BTreeSet<_>>>()?)
}
