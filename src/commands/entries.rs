// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{DateRange, EntryDraft, Field, Filter, LedgerEntry, SortOrder};
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => rm(session, sub)?,
        Some(("show", sub)) => show(session, sub)?,
        Some(("list", sub)) => list(session, sub)?,
        Some(("total", sub)) => total(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_str<'a>(sub: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    sub.get_one::<String>(name).map(|s| s.as_str())
}

/// Overlays whichever entry fields were given on the command line.
fn apply_fields(draft: &mut EntryDraft, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(d) = opt_str(sub, "date") {
        draft.date = parse_date(d)?;
    }
    if let Some(s) = opt_str(sub, "subject") {
        draft.subject = s.to_string();
    }
    if let Some(c) = opt_str(sub, "category") {
        draft.category = c.to_string();
    }
    if let Some(q) = opt_str(sub, "qty") {
        draft.quantity = parse_decimal(q)?;
    }
    if let Some(p) = opt_str(sub, "price") {
        draft.unit_price = parse_decimal(p)?;
    }
    if let Some(c) = opt_str(sub, "currency") {
        draft.currency = c.to_string();
    }
    if let Some(p) = opt_str(sub, "pnl") {
        draft.profit_loss = parse_decimal(p)?;
    }
    if let Some(n) = opt_str(sub, "note") {
        draft.note = Some(n.to_string());
    }
    Ok(())
}

fn add(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(opt_str(sub, "date").ok_or_else(|| anyhow!("--date is required"))?)?;
    let subject = opt_str(sub, "subject").ok_or_else(|| anyhow!("--subject is required"))?;
    let mut draft = session.draft(date, subject);
    apply_fields(&mut draft, sub)?;
    let id = session.add(&draft)?;
    println!(
        "Recorded #{} {} on {} ({})",
        id,
        draft.subject.trim(),
        draft.date,
        fmt_money(&draft.profit_loss, &draft.currency.to_uppercase())
    );
    Ok(())
}

fn edit(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = session.get(id)?;
    let mut draft = current.to_draft();
    apply_fields(&mut draft, sub)?;
    let updated = session.update(&LedgerEntry::from_draft(id, draft))?;
    println!("Updated #{} {}", updated.id, updated.subject);
    Ok(())
}

fn rm(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = session.delete(id)?;
    println!("Deleted #{} {} ({})", removed.id, removed.subject, removed.date);
    Ok(())
}

#[derive(Serialize)]
struct EntryView {
    #[serde(flatten)]
    entry: LedgerEntry,
    tags: Vec<String>,
}

fn show(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let entry = session.get(id)?;
    let tags = session
        .tags_for(id)?
        .into_iter()
        .map(|t| t.name)
        .collect::<Vec<_>>();
    let view = EntryView { entry, tags };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let e = &view.entry;
        let rows = vec![
            vec!["Id".into(), e.id.to_string()],
            vec!["Date".into(), e.date.to_string()],
            vec!["Category".into(), e.category.clone()],
            vec!["Subject".into(), e.subject.clone()],
            vec!["Quantity".into(), e.quantity.to_string()],
            vec!["Unit price".into(), e.unit_price.to_string()],
            vec!["Profit/Loss".into(), fmt_money(&e.profit_loss, &e.currency)],
            vec!["Note".into(), e.note.clone().unwrap_or_default()],
            vec!["Tags".into(), view.tags.join(", ")],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<LedgerEntry>> {
    let mut filters = Vec::new();
    if let Some(raw) = sub.get_many::<String>("filter") {
        for f in raw {
            filters.push(f.parse::<Filter>().map_err(|e| anyhow!(e))?);
        }
    }
    let order = match opt_str(sub, "sort") {
        Some(field) => {
            let field: Field = field.parse().map_err(|e: String| anyhow!(e))?;
            if sub.get_flag("asc") {
                SortOrder::asc(field)
            } else {
                SortOrder::desc(field)
            }
        }
        None if sub.get_flag("asc") => SortOrder::asc(Field::Date),
        None => SortOrder::default(),
    };
    let limit = sub.get_one::<u32>("limit").copied();
    let offset = sub.get_one::<u32>("offset").copied();
    Ok(session.query(&filters, &order, limit, offset)?)
}

fn list(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.category.clone(),
                    e.subject.clone(),
                    e.quantity.to_string(),
                    e.unit_price.to_string(),
                    e.currency.clone(),
                    e.profit_loss.to_string(),
                    e.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Category", "Subject", "Qty", "Price", "CCY", "P/L", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct TotalView {
    from: Option<String>,
    to: Option<String>,
    category: Option<String>,
    total: String,
}

fn total(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let range = DateRange {
        start: opt_str(sub, "from").map(parse_date).transpose()?,
        end: opt_str(sub, "to").map(parse_date).transpose()?,
    };
    let category = opt_str(sub, "category");
    let sum = session.aggregate_total(&range, category)?;
    let view = TotalView {
        from: range.start.map(|d| d.to_string()),
        to: range.end.map(|d| d.to_string()),
        category: category.map(str::to_string),
        total: sum.to_string(),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        println!(
            "Total profit/loss: {}",
            fmt_money(&sum, &session.config().base_currency)
        );
    }
    Ok(())
}
