// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

fn check_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidInput(format!(
            "month {} is out of range 1..=12",
            month
        )));
    }
    Ok(())
}

fn parse_amount(raw: &str) -> rusqlite::Result<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn set_monthly_goal(conn: &Connection, year: i32, month: u32, amount: Decimal) -> Result<()> {
    check_month(month)?;
    conn.execute(
        "INSERT INTO budget_goals(year, month, amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(year, month) DO UPDATE SET amount=excluded.amount",
        params![year, month, amount.to_string()],
    )?;
    Ok(())
}

/// Zero when no goal was set.
pub fn monthly_goal(conn: &Connection, year: i32, month: u32) -> Result<Decimal> {
    check_month(month)?;
    let raw: Option<String> = conn
        .query_row(
            "SELECT amount FROM budget_goals WHERE year=?1 AND month=?2",
            params![year, month],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(parse_amount(&s)?),
        None => Ok(Decimal::ZERO),
    }
}

/// Spreads `amount` evenly over the twelve months of `year`.
pub fn set_yearly_goal(conn: &mut Connection, year: i32, amount: Decimal) -> Result<()> {
    let monthly = amount / Decimal::from(12);
    let tx = conn.transaction()?;
    {
        let mut upsert = tx.prepare_cached(
            "INSERT INTO budget_goals(year, month, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(year, month) DO UPDATE SET amount=excluded.amount",
        )?;
        for month in 1..=12u32 {
            upsert.execute(params![year, month, monthly.to_string()])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn yearly_goal(conn: &Connection, year: i32) -> Result<Decimal> {
    let mut stmt = conn.prepare("SELECT amount FROM budget_goals WHERE year=?1")?;
    let mut rows = stmt.query(params![year])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let raw: String = r.get(0)?;
        total += parse_amount(&raw)?;
    }
    Ok(total)
}
