// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::Error;
use crate::flow::TOTAL_INCOME;

pub const CONFIG_ENV: &str = "MONTHFLOW_CONFIG";
pub const DB_ENV: &str = "MONTHFLOW_DB";

/// The fixed income and expense categories every period is recorded against.
///
/// Built once through [`CategorySchema::new`], which rejects empty groups,
/// blank or repeated names within a group, and the reserved aggregate label.
/// The same name may appear in both groups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct CategorySchema {
    income: Vec<String>,
    expenses: Vec<String>,
}

#[derive(Deserialize)]
struct RawSchema {
    income: Vec<String>,
    expenses: Vec<String>,
}

impl TryFrom<RawSchema> for CategorySchema {
    type Error = Error;

    fn try_from(raw: RawSchema) -> Result<Self, Error> {
        CategorySchema::new(raw.income, raw.expenses)
    }
}

impl CategorySchema {
    pub fn new(income: Vec<String>, expenses: Vec<String>) -> Result<Self, Error> {
        validate_group("income", &income)?;
        validate_group("expense", &expenses)?;
        Ok(Self { income, expenses })
    }

    pub fn income(&self) -> &[String] {
        &self.income
    }

    pub fn expenses(&self) -> &[String] {
        &self.expenses
    }
}

fn validate_group(label: &str, names: &[String]) -> Result<(), Error> {
    if names.is_empty() {
        return Err(Error::Schema(format!("no {} categories configured", label)));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(Error::Schema(format!("blank {} category name", label)));
        }
        if name == TOTAL_INCOME {
            return Err(Error::Schema(format!(
                "'{}' is reserved for the aggregate node",
                TOTAL_INCOME
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::Schema(format!(
                "{} category '{}' listed twice",
                label, name
            )));
        }
    }
    Ok(())
}

impl Default for CategorySchema {
    fn default() -> Self {
        let to_vec = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            income: to_vec(&["Salary", "Blog", "Other Income"]),
            expenses: to_vec(&[
                "Rent",
                "Utilities",
                "Groceries",
                "Cars",
                "Other Expenses",
                "Savings",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub categories: CategorySchema,
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            categories: CategorySchema::default(),
            database: None,
        }
    }
}

impl Config {
    /// Loads `config.json` from `$MONTHFLOW_CONFIG` or the platform config
    /// dir, falling back to the built-in categories when no file exists.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = match env::var(CONFIG_ENV) {
            Ok(p) => PathBuf::from(p),
            Err(_) => crate::db::project_dirs()?.config_dir().join("config.json"),
        };
        let mut config = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Read config {}", path.display()))?;
            let cfg = Self::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            cfg
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        if let Ok(db) = env::var(DB_ENV) {
            config.database = Some(PathBuf::from(db));
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(text)?;
        Ok(cfg)
    }
}
