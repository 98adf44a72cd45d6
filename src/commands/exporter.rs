// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::periods;
use crate::config::Config;
use crate::store::PeriodStore;
use crate::utils::required;
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("periods", sub)) => export_periods(conn, config, sub),
        Some(("flow", sub)) => export_flow(conn, config, sub),
        _ => Ok(()),
    }
}

fn export_periods(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let records = PeriodStore::new(conn).list_all()?;
    match fmt.as_str() {
        "csv" => {
            // One column per configured category, in schema order.
            let schema = &config.categories;
            let mut wtr = csv::Writer::from_path(out)?;
            let mut header = vec!["key".to_string()];
            header.extend(schema.income().iter().cloned());
            header.extend(schema.expenses().iter().cloned());
            header.push("comment".into());
            wtr.write_record(&header)?;
            for rec in &records {
                let mut row = vec![rec.key.clone()];
                for name in schema.income() {
                    row.push(rec.incomes.get(name).copied().unwrap_or(0).to_string());
                }
                for name in schema.expenses() {
                    row.push(rec.expenses.get(name).copied().unwrap_or(0).to_string());
                }
                row.push(rec.comment.clone());
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
    }
    tracing::info!(count = records.len(), out = %out, "exported periods");
    println!("Exported {} period(s) to {}", records.len(), out);
    Ok(())
}

fn export_flow(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let key = required(sub, "key")?;
    let out = required(sub, "out")?;
    let (_, flow) = periods::report(conn, config, key.trim())?;
    std::fs::write(out, serde_json::to_string_pretty(&flow.to_plotly_figure())?)?;
    println!("Exported flow for {} to {}", key, out);
    Ok(())
}
