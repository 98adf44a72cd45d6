// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{PeriodKey, SchemaIssue};
use crate::store::PeriodStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

pub fn handle(conn: &Connection, config: &Config) -> Result<()> {
    let issues = collect_issues(conn, config)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn collect_issues(conn: &Connection, config: &Config) -> Result<Vec<Issue>> {
    let store = PeriodStore::new(conn);
    let stored = store.list_stored()?;
    let mut issues = Vec::new();

    // 1) Keys saved more than once
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in &stored {
        *counts.entry(p.record.key.as_str()).or_insert(0) += 1;
    }
    for key in counts.iter().filter(|(_, n)| **n > 1).map(|(k, _)| *k) {
        let ids: Vec<String> = store
            .find_all_by_key(key)?
            .iter()
            .map(|p| format!("#{}", p.id))
            .collect();
        issues.push(Issue {
            kind: "duplicate_key",
            detail: format!("{} ({} records: {})", key, ids.len(), ids.join(", ")),
        });
    }

    // 2) Per-document checks against the current schema
    for p in &stored {
        let key = &p.record.key;
        if key.parse::<PeriodKey>().is_err() {
            issues.push(Issue {
                kind: "invalid_key",
                detail: format!("#{} '{}'", p.id, key),
            });
        }
        for issue in p.record.schema_issues(&config.categories) {
            let (kind, group, name) = match issue {
                SchemaIssue::Missing(g, n) => ("missing_category", g, n),
                SchemaIssue::Unknown(g, n) => ("unknown_category", g, n),
            };
            issues.push(Issue {
                kind,
                detail: format!("#{} {}: {} '{}'", p.id, key, group, name),
            });
        }
    }
    Ok(issues)
}
