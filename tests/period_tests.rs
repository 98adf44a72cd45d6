// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Month;
use monthflow::config::Config;
use monthflow::models::PeriodKey;
use monthflow::store::PeriodStore;
use monthflow::{cli, commands::periods, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run_add(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthflow", "period", "add"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv)?;
    if let Some(("period", period_m)) = matches.subcommand() {
        if let Some(("add", add_m)) = period_m.subcommand() {
            return periods::save(conn, &Config::default(), add_m).map(|_| ());
        }
    }
    panic!("no period add subcommand");
}

const JANUARY: &[&str] = &[
    "--year",
    "2024",
    "--month",
    "January",
    "--income",
    "Salary=3000",
    "--income",
    "Blog=200",
    "--expense",
    "Rent=1000",
    "--expense",
    "Utilities=100",
    "--expense",
    "Groceries=400",
    "--expense",
    "Savings=1700",
    "--comment",
    "quiet month",
];

#[test]
fn add_fills_every_configured_category() {
    let conn = setup();
    run_add(&conn, JANUARY).unwrap();

    let rec = PeriodStore::new(&conn)
        .find_by_key("2024_January")
        .unwrap()
        .unwrap();
    assert_eq!(rec.incomes.len(), 3);
    assert_eq!(rec.incomes["Other Income"], 0);
    assert_eq!(rec.expenses.len(), 6);
    assert_eq!(rec.expenses["Cars"], 0);
    assert_eq!(rec.expenses["Savings"], 1700);
    assert_eq!(rec.comment, "quiet month");
}

#[test]
fn add_rejects_duplicate_unless_asked() {
    let conn = setup();
    run_add(&conn, JANUARY).unwrap();
    let err = run_add(&conn, JANUARY).unwrap_err();
    assert!(err.to_string().contains("2024_January already exists"));
    assert!(err.to_string().contains("--replace"));
    // the store error underneath carries no command-line wording
    let root = err.root_cause().to_string();
    assert_eq!(root, "Period '2024_January' already exists");

    let mut dup = JANUARY.to_vec();
    dup.push("--allow-duplicate");
    run_add(&conn, &dup).unwrap();
    assert_eq!(PeriodStore::new(&conn).list_all().unwrap().len(), 2);

    run_add(
        &conn,
        &["--year", "2024", "--month", "January", "--income", "Salary=3100", "--replace"],
    )
    .unwrap();
    let all = PeriodStore::new(&conn).list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].incomes["Salary"], 3100);
}

#[test]
fn add_rejects_unknown_category_and_bad_amounts() {
    let conn = setup();
    let unknown = run_add(&conn, &["--year", "2024", "--month", "May", "--income", "Bonus=5"]);
    assert!(unknown.unwrap_err().to_string().contains("Unknown income category"));

    let negative = run_add(&conn, &["--year", "2024", "--month", "May", "--expense", "Rent=-5"]);
    assert!(negative.is_err());

    let month = run_add(&conn, &["--year", "2024", "--month", "Mai"]);
    assert!(month.unwrap_err().to_string().contains("Invalid month"));

    assert!(PeriodStore::new(&conn).list_all().unwrap().is_empty());
}

#[test]
fn report_for_saved_period() {
    let conn = setup();
    run_add(&conn, JANUARY).unwrap();
    let (rec, flow) = periods::report(&conn, &Config::default(), "2024_January").unwrap();
    assert_eq!(rec.key, "2024_January");
    assert_eq!(flow.totals.total_income, 3200);
    assert_eq!(flow.totals.total_expense, 3200);
    assert_eq!(flow.totals.remaining, 0);
}

#[test]
fn report_for_unknown_period_is_not_found() {
    let conn = setup();
    let err = periods::report(&conn, &Config::default(), "2030_June").unwrap_err();
    assert_eq!(err.to_string(), periods::NOT_FOUND);
}

#[test]
fn list_rows_include_totals() {
    let conn = setup();
    run_add(&conn, JANUARY).unwrap();
    run_add(
        &conn,
        &["--year", "2024", "--month", "February", "--income", "Salary=100", "--expense", "Rent=150"],
    )
    .unwrap();
    let rows = periods::query_rows(&conn, &Config::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].key, "2024_February");
    assert_eq!(rows[1].remaining, -50);
}

#[test]
fn period_keys_parse_and_print() {
    let key: PeriodKey = "2024_January".parse().unwrap();
    assert_eq!(key, PeriodKey::new(2024, Month::January));
    assert_eq!(key.to_string(), "2024_January");
    assert_eq!(
        PeriodKey::from_parts(2025, "September").unwrap().to_string(),
        "2025_September"
    );

    assert!("2024-01".parse::<PeriodKey>().is_err());
    assert!("2024_Janvier".parse::<PeriodKey>().is_err());
    assert!("2024_january".parse::<PeriodKey>().is_err());
    assert!("24_January".parse::<PeriodKey>().is_err());
}

#[test]
fn selectable_periods_cover_two_years() {
    let keys = periods::selectable_periods(2024);
    assert_eq!(keys.len(), 24);
    assert_eq!(keys[0].to_string(), "2024_January");
    assert_eq!(keys[23].to_string(), "2025_December");
}

#[test]
fn replace_and_allow_duplicate_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "monthflow",
        "period",
        "add",
        "--month",
        "May",
        "--replace",
        "--allow-duplicate",
    ]);
    assert!(res.is_err());
}

#[test]
fn add_rejects_years_that_are_not_four_digits() {
    let conn = setup();
    for year in ["12345", "999", "0", "-2024"] {
        let res = run_add(&conn, &["--year", year, "--month", "January"]);
        assert!(res.is_err(), "year {} was accepted", year);
    }
    run_add(&conn, &["--year", "1000", "--month", "January"]).unwrap();
    run_add(&conn, &["--year", "9999", "--month", "December"]).unwrap();

    let keys = PeriodStore::new(&conn).keys().unwrap();
    assert_eq!(keys, vec!["1000_January", "9999_December"]);
    for k in &keys {
        assert!(k.parse::<PeriodKey>().is_ok());
    }
}

#[test]
fn from_parts_checks_the_year() {
    assert!(PeriodKey::from_parts(12345, "January").is_err());
    assert!(PeriodKey::from_parts(999, "January").is_err());
    assert!(PeriodKey::from_parts(0, "January").is_err());
    assert!(PeriodKey::from_parts(2024, "January").is_ok());
}

#[test]
fn add_rejects_repeated_category() {
    let conn = setup();
    let res = run_add(
        &conn,
        &["--year", "2024", "--month", "June", "--income", "Salary=1", "--income", "Salary=2"],
    );
    assert!(res.unwrap_err().to_string().contains("given more than once"));
    assert!(PeriodStore::new(&conn).list_all().unwrap().is_empty());
}

#[test]
fn months_year_stays_in_range() {
    let res = cli::build_cli().try_get_matches_from([
        "monthflow",
        "period",
        "months",
        "--year",
        "2147483647",
    ]);
    assert!(res.is_err());
    let res = cli::build_cli().try_get_matches_from(["monthflow", "period", "months", "--year", "9999"]);
    assert!(res.is_err());

    // the library side stops at the last representable year
    assert_eq!(periods::selectable_periods(i32::MAX).len(), 12);
}
