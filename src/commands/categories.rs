// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::CategoryKind;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub kind: CategoryKind,
    pub name: String,
}

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = rows(config);
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
            let table = data
                .iter()
                .map(|r| vec![r.kind.to_string(), r.name.clone()])
                .collect();
            println!("{}", pretty_table(&["Kind", "Category"], table));
            println!("Currency: {}", config.currency);
        }
    }
    Ok(())
}

pub fn rows(config: &Config) -> Vec<CategoryRow> {
    let schema = &config.categories;
    let income = schema.income().iter().map(|n| CategoryRow {
        kind: CategoryKind::Income,
        name: n.clone(),
    });
    let expenses = schema.expenses().iter().map(|n| CategoryRow {
        kind: CategoryKind::Expense,
        name: n.clone(),
    });
    income.chain(expenses).collect()
}
