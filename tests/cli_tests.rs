// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pnlbook::{Config, Session, cli, commands, commands::entries};
use rust_decimal::Decimal;

fn setup() -> Session {
    let mut s = Session::open_in_memory(Config::new("/unused").with_base_currency("USD")).unwrap();
    for i in 1..=3 {
        let d = NaiveDate::from_ymd_opt(2025, 1, i).unwrap();
        let draft = s
            .draft(d, format!("P{}", i))
            .with_profit_loss(Decimal::from(i as i64 * 10 - 25));
        s.add(&draft).unwrap();
    }
    s
}

fn run(s: &mut Session, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().try_get_matches_from(
        std::iter::once("pnlbook").chain(args.iter().copied()),
    )?;
    commands::dispatch(s, &matches)
}

#[test]
fn list_limit_respected() {
    let s = setup();
    let matches =
        cli::build_cli().get_matches_from(["pnlbook", "entry", "list", "--limit", "2"]);
    if let Some(("entry", entry_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = entry_m.subcommand() {
            let rows = entries::query_rows(&s, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no entry subcommand");
    }
}

#[test]
fn list_filters_and_sort_flags() {
    let s = setup();
    let matches = cli::build_cli().get_matches_from([
        "pnlbook", "entry", "list", "-f", "pnl>=-5", "--sort", "pnl", "--asc",
    ]);
    let (_, entry_m) = matches.subcommand().unwrap();
    let (_, list_m) = entry_m.subcommand().unwrap();
    let rows = entries::query_rows(&s, list_m).unwrap();
    let subjects: Vec<&str> = rows.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, ["P2", "P3"]);
}

#[test]
fn bad_filter_is_reported() {
    let s = setup();
    let matches =
        cli::build_cli().get_matches_from(["pnlbook", "entry", "list", "-f", "secret=1"]);
    let (_, entry_m) = matches.subcommand().unwrap();
    let (_, list_m) = entry_m.subcommand().unwrap();
    let err = entries::query_rows(&s, list_m).unwrap_err();
    assert!(err.to_string().contains("Unknown field"));
}

#[test]
fn edit_merges_onto_existing_entry() {
    let mut s = setup();
    run(&mut s, &["entry", "edit", "--id", "2", "--note", "trimmed"]).unwrap();
    let e = s.get(2).unwrap();
    assert_eq!(e.subject, "P2");
    assert_eq!(e.note.as_deref(), Some("trimmed"));
    run(&mut s, &["undo"]).unwrap();
    assert_eq!(s.get(2).unwrap().note, None);
}

#[test]
fn tag_commands_round_trip_through_session() {
    let mut s = setup();
    run(&mut s, &["tag", "create", "--name", "swing"]).unwrap();
    run(&mut s, &["tag", "create", "--name", "core", "--color", "#123456"]).unwrap();
    run(&mut s, &["tag", "link", "--entry", "1", "--tag", "1", "2"]).unwrap();
    assert_eq!(s.tags_for(1).unwrap().len(), 2);
    run(&mut s, &["tag", "set", "--entry", "1"]).unwrap();
    assert!(s.tags_for(1).unwrap().is_empty());
    assert!(run(&mut s, &["tag", "create", "--name", "swing"]).is_err());
}

#[test]
fn add_uses_base_currency_unless_given() {
    let mut s = setup();
    run(
        &mut s,
        &["entry", "add", "--date", "2025-02-01", "--subject", "X", "--pnl", "-3.5"],
    )
    .unwrap();
    run(
        &mut s,
        &["entry", "add", "--date", "2025-02-02", "--subject", "Y", "--currency", "hkd"],
    )
    .unwrap();
    assert_eq!(s.get(4).unwrap().currency, "USD");
    assert_eq!(s.get(4).unwrap().profit_loss, "-3.5".parse::<Decimal>().unwrap());
    assert_eq!(s.get(5).unwrap().currency, "HKD");
}
