// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::Error;
use crate::flow::{self, Flow, FlowNode, Totals};
use crate::models::{PeriodKey, PeriodRecord};
use crate::store::{InsertOutcome, PeriodStore};
use crate::utils::{
    collect_entries, current_year, fmt_money, maybe_print_json, pretty_table, required,
};
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub const NOT_FOUND: &str = "Selected period not found in the database.";

pub fn handle(conn: &Connection, config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, config, sub)?,
        Some(("list", sub)) => list(conn, config, sub)?,
        Some(("show", sub)) => show(conn, config, sub)?,
        Some(("months", sub)) => months(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Refuse a key that is already stored.
    Create,
    Replace,
    AllowDuplicate,
}

impl SaveMode {
    fn from_matches(sub: &clap::ArgMatches) -> Self {
        if sub.get_flag("replace") {
            SaveMode::Replace
        } else if sub.get_flag("allow-duplicate") {
            SaveMode::AllowDuplicate
        } else {
            SaveMode::Create
        }
    }
}

/// Builds the record described by an `add` invocation and stores it.
pub fn save(
    conn: &Connection,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<(PeriodRecord, InsertOutcome)> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(current_year);
    let key = PeriodKey::from_parts(year, required(sub, "month")?.trim())?;
    let incomes = collect_entries(sub, "income")?;
    let expenses = collect_entries(sub, "expense")?;
    let comment = sub
        .get_one::<String>("comment")
        .map(|s| s.as_str())
        .unwrap_or_default();

    let record = PeriodRecord::build(&config.categories, &key, &incomes, &expenses, comment)?;
    let store = PeriodStore::new(conn);
    let outcome = match SaveMode::from_matches(sub) {
        SaveMode::Create => match store.create(&record) {
            Err(e @ Error::Duplicate(_)) => {
                return Err(e).with_context(|| {
                    format!(
                        "{} already exists; use --replace to overwrite or --allow-duplicate to keep both",
                        record.key
                    )
                });
            }
            other => other?,
        },
        SaveMode::Replace => store.upsert(&record)?,
        SaveMode::AllowDuplicate => store.insert_record(&record)?,
    };
    Ok((record, outcome))
}

fn add(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (record, outcome) = save(conn, config, sub)?;
    if outcome.acknowledged {
        println!("Data saved successfully! ({})", record.key);
        if outcome.replaced > 0 {
            println!("Replaced {} earlier record(s)", outcome.replaced);
        }
    } else {
        tracing::error!(key = %record.key, "write not acknowledged");
        println!("Failed to save data.");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PeriodRow {
    pub key: String,
    pub total_income: i64,
    pub total_expense: i64,
    pub remaining: i64,
    pub comment: String,
}

pub fn query_rows(conn: &Connection, config: &Config) -> Result<Vec<PeriodRow>> {
    let store = PeriodStore::new(conn);
    let rows = store
        .list_all()?
        .into_iter()
        .map(|rec| {
            let totals = flow::flow_for(&config.categories, &rec).totals;
            PeriodRow {
                key: rec.key,
                total_income: totals.total_income,
                total_expense: totals.total_expense,
                remaining: totals.remaining,
                comment: rec.comment,
            }
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, config)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = &config.currency;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.key.clone(),
                    fmt_money(r.total_income, ccy),
                    fmt_money(r.total_expense, ccy),
                    fmt_money(r.remaining, ccy),
                    r.comment.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Period", "Income", "Expense", "Remaining", "Comment"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PeriodReport {
    pub key: String,
    pub currency: String,
    pub comment: String,
    #[serde(flatten)]
    pub totals: Totals,
    pub nodes: Vec<FlowNode>,
    pub links: Vec<flow::FlowLink>,
}

/// Looks up `key` and runs the flow transform over it.
pub fn report(conn: &Connection, config: &Config, key: &str) -> Result<(PeriodRecord, Flow)> {
    let record = match PeriodStore::new(conn).get(key) {
        Ok(rec) => rec,
        Err(Error::NotFound(_)) => bail!(NOT_FOUND),
        Err(e) => return Err(e.into()),
    };
    let flow = flow::flow_for(&config.categories, &record);
    Ok((record, flow))
}

fn show(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let key = required(sub, "key")?;
    let (record, flow) = report(conn, config, key.trim())?;

    if sub.get_flag("plotly") {
        println!("{}", serde_json::to_string_pretty(&flow.to_plotly_figure())?);
        return Ok(());
    }

    let out = PeriodReport {
        key: record.key.clone(),
        currency: config.currency.clone(),
        comment: record.comment.clone(),
        totals: flow.totals,
        nodes: flow.nodes.clone(),
        links: flow.links.clone(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        return Ok(());
    }

    let ccy = &config.currency;
    let metrics = vec![vec![
        fmt_money(flow.totals.total_income, ccy),
        fmt_money(flow.totals.total_expense, ccy),
        fmt_money(flow.totals.remaining, ccy),
    ]];
    println!("{}", record.key);
    println!(
        "{}",
        pretty_table(&["Total Income", "Total Expense", "Remaining Budget"], metrics)
    );
    println!("Comment: {}", record.comment);

    let links = flow
        .links
        .iter()
        .map(|l| {
            vec![
                flow.nodes[l.source].label.clone(),
                flow.nodes[l.target].label.clone(),
                fmt_money(i64::from(l.value), ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["From", "To", "Amount"], links));
    Ok(())
}

fn months(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(current_year);
    let mut saved: HashMap<String, usize> = HashMap::new();
    for key in PeriodStore::new(conn).keys()? {
        *saved.entry(key).or_insert(0) += 1;
    }
    let rows = selectable_periods(year)
        .into_iter()
        .map(|k| {
            let key = k.to_string();
            let n = saved.get(&key).copied().unwrap_or(0);
            vec![key, if n > 0 { n.to_string() } else { "-".into() }]
        })
        .collect();
    println!("{}", pretty_table(&["Period", "Saved"], rows));
    Ok(())
}

/// Every month of `year` and of the following year.
pub fn selectable_periods(year: i32) -> Vec<PeriodKey> {
    let mut keys = PeriodKey::months_of(year);
    if let Some(next) = year.checked_add(1) {
        keys.extend(PeriodKey::months_of(next));
    }
    keys
}
