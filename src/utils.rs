// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn fmt_money(amount: i64, ccy: &str) -> String {
    format!("{} {}", amount, ccy)
}

pub fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .ok_or_else(|| anyhow!("Missing required argument '{}'", id))
}

/// Parses a `Category=Amount` pair, e.g. `Other Income=250`.
pub fn parse_entry(s: &str) -> Result<(String, u32)> {
    let (name, amount) = s
        .rsplit_once('=')
        .with_context(|| format!("Invalid entry '{}', expected CATEGORY=AMOUNT", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Missing category name in '{}'", s));
    }
    let amount: u32 = amount.trim().parse().with_context(|| {
        format!(
            "Invalid amount '{}' for {}, expected a non-negative integer",
            amount.trim(),
            name
        )
    })?;
    Ok((name.to_string(), amount))
}

pub fn collect_entries(m: &clap::ArgMatches, id: &str) -> Result<Vec<(String, u32)>> {
    m.get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(|s| parse_entry(s))
        .collect()
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
