// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger entry persistence: validated CRUD plus the filter/sort/page query
//! surface. Every mutation runs inside its own SQLite transaction and is
//! committed before the call returns.

use crate::error::{LedgerError, Result};
use crate::models::{
    DEFAULT_CATEGORY, DateRange, EntryDraft, Field, Filter, FilterOp, FilterValue, LedgerEntry,
    SortOrder,
};
use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const COLUMNS: &str =
    "id, date, category, subject, quantity, unit_price, currency, profit_loss, note";

/// An entry removed by [`delete`], with the tag links the cascade dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedEntry {
    pub entry: LedgerEntry,
    pub tag_ids: Vec<i64>,
}

// Fixed column order, see COLUMNS.
fn from_row(r: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    Ok(LedgerEntry {
        id: r.get(0)?,
        date: r.get(1)?,
        category: r.get(2)?,
        subject: r.get(3)?,
        quantity: decimal_at(r, 4)?,
        unit_price: decimal_at(r, 5)?,
        currency: r.get(6)?,
        profit_loss: decimal_at(r, 7)?,
        note: r.get(8)?,
    })
}

fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Trims and checks a draft; returns the form that gets stored.
pub fn normalize(draft: &EntryDraft) -> Result<EntryDraft> {
    let subject = draft.subject.trim();
    if subject.is_empty() {
        return Err(LedgerError::InvalidInput("subject must not be empty".into()));
    }
    let currency = draft.currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::InvalidInput(format!(
            "currency '{}' is not a 3-letter code",
            draft.currency
        )));
    }
    let category = match draft.category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        c => c.to_string(),
    };
    let note = draft
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok(EntryDraft {
        date: draft.date,
        category,
        subject: subject.to_string(),
        quantity: draft.quantity,
        unit_price: draft.unit_price,
        currency,
        profit_loss: draft.profit_loss,
        note,
    })
}

/// Inserts a new row and returns it with its store-assigned id.
pub fn add(conn: &mut Connection, draft: &EntryDraft) -> Result<LedgerEntry> {
    let draft = normalize(draft)?;
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO entries(date, category, subject, quantity, unit_price, currency, profit_loss, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            draft.date,
            draft.category,
            draft.subject,
            draft.quantity.to_string(),
            draft.unit_price.to_string(),
            draft.currency,
            draft.profit_loss.to_string(),
            draft.note
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(LedgerEntry::from_draft(id, draft))
}

/// Re-inserts a previously stored entry under its original id and relinks
/// whichever of `tag_ids` still exist.
pub fn restore(conn: &mut Connection, entry: &LedgerEntry, tag_ids: &[i64]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO entries(id, date, category, subject, quantity, unit_price, currency, profit_loss, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.id,
            entry.date,
            entry.category,
            entry.subject,
            entry.quantity.to_string(),
            entry.unit_price.to_string(),
            entry.currency,
            entry.profit_loss.to_string(),
            entry.note
        ],
    )?;
    {
        let mut link = tx.prepare_cached(
            "INSERT OR IGNORE INTO entry_tags(entry_id, tag_id) SELECT ?1, id FROM tags WHERE id=?2",
        )?;
        for tag_id in tag_ids {
            link.execute(params![entry.id, tag_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<LedgerEntry> {
    find(conn, id)?.ok_or_else(|| LedgerError::entry_not_found(id))
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<LedgerEntry>> {
    let sql = format!("SELECT {} FROM entries WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row("SELECT 1 FROM entries WHERE id=?1", params![id], |r| r.get(0))
        .optional()?;
    Ok(hit.is_some())
}

/// Full-record replace keyed by `entry.id`. Returns the row as it was
/// before the write.
pub fn update(conn: &mut Connection, entry: &LedgerEntry) -> Result<LedgerEntry> {
    let draft = normalize(&entry.to_draft())?;
    let tx = conn.transaction()?;
    let sql = format!("SELECT {} FROM entries WHERE id=?1", COLUMNS);
    let before = tx
        .query_row(&sql, params![entry.id], from_row)
        .optional()?
        .ok_or_else(|| LedgerError::entry_not_found(entry.id))?;
    tx.execute(
        "UPDATE entries SET date=?1, category=?2, subject=?3, quantity=?4, unit_price=?5,
             currency=?6, profit_loss=?7, note=?8
         WHERE id=?9",
        params![
            draft.date,
            draft.category,
            draft.subject,
            draft.quantity.to_string(),
            draft.unit_price.to_string(),
            draft.currency,
            draft.profit_loss.to_string(),
            draft.note,
            entry.id
        ],
    )?;
    tx.commit()?;
    Ok(before)
}

/// Removes the row and, through the foreign-key cascade, its tag links.
pub fn delete(conn: &mut Connection, id: i64) -> Result<DeletedEntry> {
    let tx = conn.transaction()?;
    let sql = format!("SELECT {} FROM entries WHERE id=?1", COLUMNS);
    let entry = tx
        .query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or_else(|| LedgerError::entry_not_found(id))?;
    let tag_ids = {
        let mut stmt =
            tx.prepare_cached("SELECT tag_id FROM entry_tags WHERE entry_id=?1 ORDER BY tag_id")?;
        let rows = stmt.query_map(params![id], |r| r.get::<_, i64>(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };
    tx.execute("DELETE FROM entries WHERE id=?1", params![id])?;
    tx.commit()?;
    Ok(DeletedEntry { entry, tag_ids })
}

pub(crate) fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn date_value(v: &FilterValue) -> Result<NaiveDate> {
    match v {
        FilterValue::Date(d) => Ok(*d),
        FilterValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", s))
        }),
        FilterValue::Number(n) => Err(LedgerError::InvalidInput(format!(
            "date cannot be compared with number {}",
            n
        ))),
    }
}

fn number_value(field: Field, v: &FilterValue) -> Result<f64> {
    let d = match v {
        FilterValue::Number(n) => *n,
        FilterValue::Text(s) => s.trim().parse::<Decimal>().map_err(|_| {
            LedgerError::InvalidInput(format!("Invalid number '{}' for {}", s, field))
        })?,
        FilterValue::Date(d) => {
            return Err(LedgerError::InvalidInput(format!(
                "{} cannot be compared with date {}",
                field, d
            )));
        }
    };
    d.to_f64()
        .ok_or_else(|| LedgerError::InvalidInput(format!("Number {} out of range", d)))
}

/// Appends one condition to `sql` and its bound value to `args`.
fn push_filter(sql: &mut String, args: &mut Vec<Value>, f: &Filter) -> Result<()> {
    let col = f.field.column();
    match f.op {
        FilterOp::Contains => {
            sql.push_str(&format!(" AND {} LIKE ? ESCAPE '\\'", col));
            args.push(Value::Text(like_pattern(&f.value.to_string())));
        }
        op if f.field.is_numeric() => {
            sql.push_str(&format!(" AND CAST({} AS REAL) {} ?", col, op.sql()));
            args.push(Value::Real(number_value(f.field, &f.value)?));
        }
        op if f.field == Field::Date => {
            sql.push_str(&format!(" AND date {} ?", op.sql()));
            args.push(Value::Text(date_value(&f.value)?.to_string()));
        }
        op => {
            sql.push_str(&format!(" AND {} {} ?", col, op.sql()));
            args.push(Value::Text(f.value.to_string()));
        }
    }
    Ok(())
}

fn order_clause(order: &SortOrder) -> String {
    let dir = if order.descending { "DESC" } else { "ASC" };
    let key = if order.field.is_numeric() {
        format!("CAST({} AS REAL)", order.field.column())
    } else {
        order.field.column().to_string()
    };
    // id follows the primary key so equal keys page deterministically
    format!(" ORDER BY {} {}, id {}", key, dir, dir)
}

/// Entries matching every filter, sorted, then paged.
pub fn query(
    conn: &Connection,
    filters: &[Filter],
    order: &SortOrder,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<LedgerEntry>> {
    let mut sql = format!("SELECT {} FROM entries WHERE 1=1", COLUMNS);
    let mut args: Vec<Value> = Vec::new();
    for f in filters {
        push_filter(&mut sql, &mut args, f)?;
    }
    sql.push_str(&order_clause(order));
    match (limit, offset) {
        (Some(l), o) => {
            sql.push_str(" LIMIT ? OFFSET ?");
            args.push(Value::Integer(i64::from(l)));
            args.push(Value::Integer(i64::from(o.unwrap_or(0))));
        }
        (None, Some(o)) => {
            sql.push_str(" LIMIT -1 OFFSET ?");
            args.push(Value::Integer(i64::from(o)));
        }
        (None, None) => {}
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args), from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count(conn: &Connection, filters: &[Filter]) -> Result<u64> {
    let mut sql = String::from("SELECT COUNT(*) FROM entries WHERE 1=1");
    let mut args: Vec<Value> = Vec::new();
    for f in filters {
        push_filter(&mut sql, &mut args, f)?;
    }
    let n: i64 = conn.query_row(&sql, params_from_iter(args), |r| r.get(0))?;
    Ok(n as u64)
}

/// Entries dated within `[start, end]`, newest first.
pub fn entries_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LedgerEntry>> {
    let filters = DateRange::between(start, end).filters();
    query(conn, &filters, &SortOrder::default(), None, None)
}

/// Sum of `profit_loss` over the matching rows; zero when nothing matches.
pub fn aggregate_total(
    conn: &Connection,
    range: &DateRange,
    category: Option<&str>,
) -> Result<Decimal> {
    let mut sql = String::from("SELECT profit_loss FROM entries WHERE 1=1");
    let mut args: Vec<Value> = Vec::new();
    for f in range.filters() {
        push_filter(&mut sql, &mut args, &f)?;
    }
    if let Some(cat) = category {
        push_filter(&mut sql, &mut args, &Filter::eq(Field::Category, cat))?;
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(args))?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        total += decimal_at(r, 0)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("a%b_c"), "%a\\%b\\_c%");
        assert_eq!(like_pattern("x"), "%x%");
    }

    #[test]
    fn normalize_defaults_and_rejects() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut draft = EntryDraft::new(d, "  AAA ", "usd").with_category(" ");
        draft.note = Some("   ".into());
        let n = normalize(&draft).unwrap();
        assert_eq!(n.subject, "AAA");
        assert_eq!(n.currency, "USD");
        assert_eq!(n.category, DEFAULT_CATEGORY);
        assert_eq!(n.note, None);

        let blank = EntryDraft::new(d, " ", "USD");
        assert!(matches!(normalize(&blank), Err(LedgerError::InvalidInput(_))));
        let bad_ccy = EntryDraft::new(d, "AAA", "US");
        assert!(matches!(normalize(&bad_ccy), Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn numeric_sort_is_not_lexical() {
        let o = order_clause(&SortOrder::asc(Field::ProfitLoss));
        assert_eq!(o, " ORDER BY CAST(profit_loss AS REAL) ASC, id ASC");
    }
}
