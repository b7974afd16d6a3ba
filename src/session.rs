// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One opened profile: the SQLite connection, the undo/redo history and the
//! configuration they were opened with. Entry mutations go through the
//! history; reads and tag edits talk to the repositories directly.

use crate::categories;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::goals;
use crate::history::{History, Pending};
use crate::models::{DateRange, EntryDraft, Filter, LedgerEntry, SortOrder, Tag, TagPatch};
use crate::records;
use crate::tags;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::info;

pub struct Session {
    conn: Connection,
    history: History,
    config: Config,
}

impl Session {
    /// Opens (creating if needed) the profile database described by `config`.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let path = db::db_path(&config)?;
        let conn = db::open(&path)?;
        info!(profile = %config.profile, path = %path.display(), "session opened");
        Ok(Session {
            conn,
            history: History::new(),
            config,
        })
    }

    pub fn open_in_memory(config: Config) -> Result<Self> {
        Ok(Session {
            conn: db::open_in_memory()?,
            history: History::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A draft in the profile's base currency.
    pub fn draft(&self, date: NaiveDate, subject: impl Into<String>) -> EntryDraft {
        EntryDraft::new(date, subject, self.config.base_currency.clone())
    }

    /// Read-only view for reporting and export code.
    pub fn reader(&self) -> LedgerReader<'_> {
        LedgerReader { conn: &self.conn }
    }

    // Entry mutations (undoable)

    pub fn add(&mut self, draft: &EntryDraft) -> Result<i64> {
        Ok(self.history.add(&mut self.conn, draft)?.id)
    }

    pub fn update(&mut self, entry: &LedgerEntry) -> Result<LedgerEntry> {
        self.history.update(&mut self.conn, entry)
    }

    pub fn delete(&mut self, id: i64) -> Result<LedgerEntry> {
        self.history.delete(&mut self.conn, id)
    }

    pub fn undo(&mut self) -> Result<Pending> {
        self.history.undo(&mut self.conn)
    }

    pub fn redo(&mut self) -> Result<Pending> {
        self.history.redo(&mut self.conn)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // Entry reads

    pub fn get(&self, id: i64) -> Result<LedgerEntry> {
        records::get(&self.conn, id)
    }

    pub fn query(
        &self,
        filters: &[Filter],
        order: &SortOrder,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<LedgerEntry>> {
        records::query(&self.conn, filters, order, limit, offset)
    }

    pub fn count(&self, filters: &[Filter]) -> Result<u64> {
        records::count(&self.conn, filters)
    }

    pub fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LedgerEntry>> {
        records::entries_between(&self.conn, start, end)
    }

    pub fn aggregate_total(&self, range: &DateRange, category: Option<&str>) -> Result<Decimal> {
        records::aggregate_total(&self.conn, range, category)
    }

    // Tags (not undoable)

    pub fn create_tag(
        &self,
        name: &str,
        color: Option<&str>,
        description: Option<&str>,
    ) -> Result<i64> {
        tags::create_tag(&self.conn, name, color, description)
    }

    pub fn edit_tag(&mut self, id: i64, patch: &TagPatch) -> Result<Tag> {
        tags::edit_tag(&mut self.conn, id, patch)
    }

    pub fn delete_tag(&self, id: i64) -> Result<()> {
        tags::delete_tag(&self.conn, id)
    }

    pub fn get_tag(&self, id: i64) -> Result<Tag> {
        tags::get_tag(&self.conn, id)
    }

    pub fn tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        tags::tag_by_name(&self.conn, name)
    }

    pub fn all_tags(&self) -> Result<Vec<Tag>> {
        tags::all_tags(&self.conn)
    }

    pub fn search_tags(&self, text: &str) -> Result<Vec<Tag>> {
        tags::search_tags(&self.conn, text)
    }

    pub fn link(&self, entry_id: i64, tag_id: i64) -> Result<bool> {
        tags::link(&self.conn, entry_id, tag_id)
    }

    pub fn unlink(&self, entry_id: i64, tag_id: i64) -> Result<bool> {
        tags::unlink(&self.conn, entry_id, tag_id)
    }

    pub fn link_many(&self, entry_id: i64, tag_ids: &[i64]) -> Result<usize> {
        tags::link_many(&self.conn, entry_id, tag_ids)
    }

    pub fn unlink_many(&self, entry_id: i64, tag_ids: &[i64]) -> Result<usize> {
        tags::unlink_many(&self.conn, entry_id, tag_ids)
    }

    pub fn replace_links(&mut self, entry_id: i64, tag_ids: &[i64]) -> Result<()> {
        tags::replace_links(&mut self.conn, entry_id, tag_ids)
    }

    pub fn tags_for(&self, entry_id: i64) -> Result<Vec<Tag>> {
        tags::tags_for(&self.conn, entry_id)
    }

    pub fn entries_for(&self, tag_id: i64) -> Result<BTreeSet<i64>> {
        tags::entries_for(&self.conn, tag_id)
    }

    // Category presets and budget goals

    pub fn categories(&self) -> Result<Vec<String>> {
        categories::categories(&self.conn)
    }

    pub fn add_category(&self, name: &str) -> Result<i64> {
        categories::add_category(&self.conn, name)
    }

    pub fn remove_category(&self, name: &str) -> Result<()> {
        categories::remove_category(&self.conn, name)
    }

    pub fn set_monthly_goal(&self, year: i32, month: u32, amount: Decimal) -> Result<()> {
        goals::set_monthly_goal(&self.conn, year, month, amount)
    }

    pub fn monthly_goal(&self, year: i32, month: u32) -> Result<Decimal> {
        goals::monthly_goal(&self.conn, year, month)
    }

    pub fn set_yearly_goal(&mut self, year: i32, amount: Decimal) -> Result<()> {
        goals::set_yearly_goal(&mut self.conn, year, amount)
    }

    pub fn yearly_goal(&self, year: i32) -> Result<Decimal> {
        goals::yearly_goal(&self.conn, year)
    }

    /// Releases the connection; the history goes with it.
    pub fn close(self) -> Result<()> {
        let undoable = self.history.undo_depth();
        self.conn.close().map_err(|(_, e)| e)?;
        info!(profile = %self.config.profile, discarded = undoable, "session closed");
        Ok(())
    }
}

/// Borrowed, read-only access to one session's data.
#[derive(Clone, Copy)]
pub struct LedgerReader<'a> {
    conn: &'a Connection,
}

impl LedgerReader<'_> {
    pub fn get(&self, id: i64) -> Result<LedgerEntry> {
        records::get(self.conn, id)
    }

    pub fn query(
        &self,
        filters: &[Filter],
        order: &SortOrder,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<LedgerEntry>> {
        records::query(self.conn, filters, order, limit, offset)
    }

    pub fn aggregate_total(&self, range: &DateRange, category: Option<&str>) -> Result<Decimal> {
        records::aggregate_total(self.conn, range, category)
    }

    pub fn tags_for(&self, entry_id: i64) -> Result<Vec<Tag>> {
        tags::tags_for(self.conn, entry_id)
    }
}
