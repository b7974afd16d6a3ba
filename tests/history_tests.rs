// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pnlbook::{Config, LedgerEntry, LedgerError, OperationKind, Session, SortOrder};
use rust_decimal::Decimal;

fn session() -> Session {
    Session::open_in_memory(Config::new("/unused").with_base_currency("USD")).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn snapshot(s: &Session) -> Vec<LedgerEntry> {
    s.query(&[], &SortOrder::default(), None, None).unwrap()
}

#[test]
fn update_undo_redo_scenario() {
    let mut s = session();
    let draft = s.draft(day(1), "AAA").with_profit_loss(Decimal::from(100));
    let id = s.add(&draft).unwrap();
    assert_eq!(id, 1);

    let mut e = s.get(id).unwrap();
    e.profit_loss = Decimal::from(200);
    s.update(&e).unwrap();

    s.undo().unwrap();
    assert_eq!(s.get(id).unwrap().profit_loss, Decimal::from(100));
    s.redo().unwrap();
    assert_eq!(s.get(id).unwrap().profit_loss, Decimal::from(200));
}

#[test]
fn undo_replays_history_backwards() {
    let mut s = session();
    let mut states = vec![snapshot(&s)];

    let a = s.add(&s.draft(day(1), "A")).unwrap();
    states.push(snapshot(&s));
    let b = s.add(&s.draft(day(2), "B")).unwrap();
    states.push(snapshot(&s));
    let mut e = s.get(a).unwrap();
    e.subject = "A2".into();
    e.note = Some("renamed".into());
    s.update(&e).unwrap();
    states.push(snapshot(&s));
    s.delete(b).unwrap();
    states.push(snapshot(&s));

    for expected in states.iter().rev().skip(1) {
        s.undo().unwrap();
        assert_eq!(&snapshot(&s), expected);
    }
    assert!(!s.can_undo());
    assert!(matches!(s.undo(), Err(LedgerError::NothingToUndo)));

    for expected in states.iter().skip(1) {
        s.redo().unwrap();
        assert_eq!(&snapshot(&s), expected);
    }
    assert!(matches!(s.redo(), Err(LedgerError::NothingToRedo)));
}

#[test]
fn undo_redo_undo_round_trip() {
    let mut s = session();
    s.add(&s.draft(day(1), "A")).unwrap();
    let before = snapshot(&s);
    let id = s.add(&s.draft(day(2), "B")).unwrap();
    let after = snapshot(&s);

    s.undo().unwrap();
    assert_eq!(snapshot(&s), before);
    s.redo().unwrap();
    assert_eq!(snapshot(&s), after);
    assert_eq!(s.get(id).unwrap().subject, "B");
    s.undo().unwrap();
    assert_eq!(snapshot(&s), before);
}

#[test]
fn new_change_after_undo_clears_redo() {
    let mut s = session();
    s.add(&s.draft(day(1), "A")).unwrap();
    s.undo().unwrap();
    assert!(s.can_redo());
    s.add(&s.draft(day(2), "B")).unwrap();
    assert!(!s.can_redo());
    assert!(matches!(s.redo(), Err(LedgerError::NothingToRedo)));
}

#[test]
fn deleting_missing_id_does_not_touch_history() {
    let mut s = session();
    s.add(&s.draft(day(1), "A")).unwrap();
    let depth = s.history().undo_depth();
    assert!(s.delete(99).unwrap_err().is_not_found());
    assert_eq!(s.history().undo_depth(), depth);
}

#[test]
fn undo_of_delete_restores_same_id_and_tags() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A").with_note("keep me")).unwrap();
    let tag = s.create_tag("core", None, None).unwrap();
    s.link(id, tag).unwrap();
    let original = s.get(id).unwrap();

    s.delete(id).unwrap();
    assert!(s.tags_for(id).unwrap().is_empty());

    let undone = s.undo().unwrap();
    assert_eq!(undone.kind, OperationKind::Delete);
    assert_eq!(s.get(id).unwrap(), original);
    assert_eq!(s.tags_for(id).unwrap().len(), 1);
}

#[test]
fn update_undo_restores_full_pre_image() {
    let mut s = session();
    let id = s
        .add(&s.draft(day(1), "A").with_category("Fund").with_note("n"))
        .unwrap();
    let original = s.get(id).unwrap();
    let mut e = original.clone();
    e.category = "Bond".into();
    e.note = None;
    e.quantity = Decimal::from(3);
    s.update(&e).unwrap();
    s.undo().unwrap();
    assert_eq!(s.get(id).unwrap(), original);
}

#[test]
fn failed_update_is_not_recorded() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A")).unwrap();
    let mut e = s.get(id).unwrap();
    e.subject = String::new();
    assert!(matches!(s.update(&e), Err(LedgerError::InvalidInput(_))));
    assert_eq!(s.history().undo_depth(), 1);
    assert_eq!(s.history().peek_undo().unwrap().kind, OperationKind::Add);
}

#[test]
fn tag_links_are_not_undoable() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A")).unwrap();
    let tag = s.create_tag("t", None, None).unwrap();
    s.link(id, tag).unwrap();
    assert_eq!(s.history().undo_depth(), 1);
    s.undo().unwrap();
    assert!(s.get(id).unwrap_err().is_not_found());
    assert!(s.entries_for(tag).unwrap().is_empty());
}

#[test]
fn peeks_describe_the_next_step() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A")).unwrap();
    s.delete(id).unwrap();
    let next = s.history().peek_undo().unwrap();
    assert_eq!((next.kind, next.entry_id), (OperationKind::Delete, id));
    s.undo().unwrap();
    let next = s.history().peek_redo().unwrap();
    assert_eq!(next.kind, OperationKind::Delete);
    assert_eq!(s.history().redo_depth(), 1);
}

#[test]
fn redo_of_add_brings_back_links_made_after_it() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A")).unwrap();
    let tag = s.create_tag("t", None, None).unwrap();
    s.link(id, tag).unwrap();

    s.undo().unwrap();
    assert!(s.entries_for(tag).unwrap().is_empty());
    s.redo().unwrap();
    assert_eq!(s.tags_for(id).unwrap().len(), 1);

    s.undo().unwrap();
    s.redo().unwrap();
    assert_eq!(s.entries_for(tag).unwrap().into_iter().collect::<Vec<_>>(), [id]);
}

#[test]
fn links_added_between_undo_and_redo_of_delete_survive() {
    let mut s = session();
    let id = s.add(&s.draft(day(1), "A")).unwrap();
    let t1 = s.create_tag("t1", None, None).unwrap();
    let t2 = s.create_tag("t2", None, None).unwrap();
    s.link(id, t1).unwrap();

    s.delete(id).unwrap();
    s.undo().unwrap();
    s.link(id, t2).unwrap();
    s.redo().unwrap();
    assert!(s.get(id).unwrap_err().is_not_found());

    s.undo().unwrap();
    let names: Vec<String> = s.tags_for(id).unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, ["t1", "t2"]);
}
