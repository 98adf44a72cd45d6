// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::CategorySchema;
use crate::error::{Error, Result};

/// Category name -> non-negative amount.
pub type Amounts = BTreeMap<String, u32>;

/// Years a period key can carry; keys always print a four-digit year.
pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})_([A-Za-z]+)$").unwrap());

/// A budgeting interval, rendered as `{year}_{MonthName}` (e.g. `2024_January`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Month,
}

impl PeriodKey {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Builds a key from a four-digit year and a full English month name.
    pub fn from_parts(year: i32, month: &str) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::Validation(format!(
                "Invalid year {}, expected {}..={}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
        Ok(Self::new(year, month_from_name(month)?))
    }

    /// All twelve periods of `year`, January first.
    pub fn months_of(year: i32) -> Vec<PeriodKey> {
        (1..=12u8)
            .filter_map(|m| Month::try_from(m).ok())
            .map(|m| PeriodKey::new(year, m))
            .collect()
    }
}

fn month_from_name(name: &str) -> Result<Month> {
    (1..=12u8)
        .filter_map(|m| Month::try_from(m).ok())
        .find(|m| m.name() == name)
        .ok_or_else(|| {
            Error::Validation(format!(
                "Invalid month '{}', expected a full month name like 'January'",
                name
            ))
        })
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.year, self.month.name())
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = KEY_RE.captures(s).ok_or_else(|| {
            Error::Validation(format!("Invalid period '{}', expected YEAR_Month", s))
        })?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| Error::Validation(format!("Invalid year in period '{}'", s)))?;
        Self::from_parts(year, &caps[2])
    }
}

/// One stored month. Serializes to the flat document
/// `{key, inc, expenses, comment}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub key: String,
    #[serde(rename = "inc")]
    pub incomes: Amounts,
    pub expenses: Amounts,
    #[serde(default)]
    pub comment: String,
}

impl PeriodRecord {
    pub fn new(
        key: impl Into<String>,
        incomes: Amounts,
        expenses: Amounts,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            incomes,
            expenses,
            comment: comment.into(),
        }
    }

    /// Builds a record holding exactly the schema's categories. Entries not
    /// given are stored as 0; entries naming an unknown category are rejected.
    pub fn build(
        schema: &CategorySchema,
        key: &PeriodKey,
        incomes: &[(String, u32)],
        expenses: &[(String, u32)],
        comment: &str,
    ) -> Result<Self> {
        let incomes = fill_group("income", schema.income(), incomes)?;
        let expenses = fill_group("expense", schema.expenses(), expenses)?;
        Ok(Self::new(key.to_string(), incomes, expenses, comment))
    }

    /// Differences between this record's mappings and `schema`.
    pub fn schema_issues(&self, schema: &CategorySchema) -> Vec<SchemaIssue> {
        let mut issues = group_issues(CategoryKind::Income, schema.income(), &self.incomes);
        issues.extend(group_issues(
            CategoryKind::Expense,
            schema.expenses(),
            &self.expenses,
        ));
        issues
    }
}

fn fill_group(label: &str, names: &[String], entries: &[(String, u32)]) -> Result<Amounts> {
    let mut out: Amounts = names.iter().map(|n| (n.clone(), 0)).collect();
    let mut given = HashSet::new();
    for (name, amount) in entries {
        if !given.insert(name.as_str()) {
            return Err(Error::Validation(format!(
                "{} category '{}' given more than once",
                label, name
            )));
        }
        match out.get_mut(name) {
            Some(slot) => *slot = *amount,
            None => {
                return Err(Error::Validation(format!(
                    "Unknown {} category '{}' (expected one of: {})",
                    label,
                    name,
                    names.join(", ")
                )));
            }
        }
    }
    Ok(out)
}

fn group_issues(kind: CategoryKind, names: &[String], amounts: &Amounts) -> Vec<SchemaIssue> {
    let missing = names
        .iter()
        .filter(|n| !amounts.contains_key(*n))
        .map(|n| SchemaIssue::Missing(kind, n.clone()));
    let unknown = amounts
        .keys()
        .filter(|k| !names.contains(*k))
        .map(|k| SchemaIssue::Unknown(kind, k.clone()));
    missing.chain(unknown).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Income => f.write_str("income"),
            CategoryKind::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    /// Configured category absent from the record.
    Missing(CategoryKind, String),
    /// Record category that is not configured.
    Unknown(CategoryKind, String),
}

/// A record together with its storage row id, the only thing that tells
/// duplicate keys apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPeriod {
    pub id: i64,
    #[serde(flatten)]
    pub record: PeriodRecord,
}
