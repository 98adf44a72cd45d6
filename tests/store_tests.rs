// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthflow::models::{Amounts, PeriodRecord};
use monthflow::store::PeriodStore;
use monthflow::{db, Error};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn amounts(pairs: &[(&str, u32)]) -> Amounts {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn january() -> PeriodRecord {
    PeriodRecord::new(
        "2024_January",
        amounts(&[("Salary", 5000), ("Blog", 120), ("Other Income", 0)]),
        amounts(&[
            ("Rent", 1200),
            ("Utilities", 150),
            ("Groceries", 400),
            ("Cars", 0),
            ("Other Expenses", 75),
            ("Savings", 2000),
        ]),
        "x",
    )
}

#[test]
fn insert_then_find_round_trips() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    let rec = january();
    let outcome = store
        .insert(&rec.key, &rec.incomes, &rec.expenses, &rec.comment)
        .unwrap();
    assert!(outcome.acknowledged);
    assert_eq!(outcome.replaced, 0);

    let found = store.find_by_key("2024_January").unwrap();
    assert_eq!(found, Some(rec));
}

#[test]
fn find_missing_key_is_none() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    store.insert_record(&january()).unwrap();
    assert_eq!(store.find_by_key("2024_February").unwrap(), None);
    assert!(matches!(
        store.get("2024_February"),
        Err(Error::NotFound(k)) if k == "2024_February"
    ));
}

#[test]
fn list_all_counts_duplicates() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    let rec = january();
    store.insert_record(&rec).unwrap();
    store.insert_record(&rec).unwrap();
    let mut feb = rec.clone();
    feb.key = "2024_February".into();
    store.insert_record(&feb).unwrap();

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(
        store.keys().unwrap(),
        vec!["2024_January", "2024_January", "2024_February"]
    );
    let dupes = store.find_all_by_key("2024_January").unwrap();
    assert_eq!(dupes.len(), 2);
    assert!(dupes[0].id < dupes[1].id);
}

#[test]
fn find_by_key_returns_earliest_duplicate() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    let first = january();
    let mut second = january();
    second.comment = "second".into();
    store.insert_record(&first).unwrap();
    store.insert_record(&second).unwrap();
    assert_eq!(store.find_by_key("2024_January").unwrap().unwrap().comment, "x");
}

#[test]
fn create_rejects_existing_key() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    store.create(&january()).unwrap();
    let err = store.create(&january()).unwrap_err();
    assert!(matches!(err, Error::Duplicate(k) if k == "2024_January"));
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn upsert_replaces_all_documents_for_key() {
    let conn = setup();
    let store = PeriodStore::new(&conn);
    store.insert_record(&january()).unwrap();
    store.insert_record(&january()).unwrap();

    let mut updated = january();
    updated.incomes.insert("Salary".into(), 5200);
    let outcome = store.upsert(&updated).unwrap();
    assert!(outcome.acknowledged);
    assert_eq!(outcome.replaced, 2);

    let all = store.list_all().unwrap();
    assert_eq!(all, vec![updated]);
}

#[test]
fn stored_document_has_flat_shape() {
    let conn = setup();
    PeriodStore::new(&conn).insert_record(&january()).unwrap();
    let doc: String = conn
        .query_row("SELECT doc FROM periods", [], |r| r.get(0))
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&doc).unwrap();
    assert_eq!(v["key"], "2024_January");
    assert_eq!(v["inc"]["Salary"], 5000);
    assert_eq!(v["expenses"]["Rent"], 1200);
    assert_eq!(v["comment"], "x");
}

#[test]
fn undecodable_document_is_an_error() {
    let conn = setup();
    conn.execute(
        "INSERT INTO periods(key, doc) VALUES ('2024_March', '{\"key\":\"2024_March\",\"inc\":{\"Salary\":-5},\"expenses\":{}}')",
        [],
    )
    .unwrap();
    let store = PeriodStore::new(&conn);
    assert!(matches!(
        store.find_by_key("2024_March"),
        Err(Error::Document(_))
    ));
}

#[test]
fn init_schema_is_idempotent() {
    let conn = setup();
    db::init_schema(&conn).unwrap();
    PeriodStore::new(&conn).insert_record(&january()).unwrap();
    db::init_schema(&conn).unwrap();
    assert_eq!(PeriodStore::new(&conn).list_all().unwrap().len(), 1);
}
