// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The `periods` collection: one JSON document per saved month.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Amounts, PeriodRecord, StoredPeriod};

/// Result of a write. `acknowledged` is false when the database reported no
/// row written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub id: i64,
    pub acknowledged: bool,
    /// Documents removed by an upsert before writing.
    pub replaced: usize,
}

pub struct PeriodStore<'c> {
    conn: &'c Connection,
}

impl<'c> PeriodStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Appends a document without looking at existing keys.
    pub fn insert(
        &self,
        key: &str,
        incomes: &Amounts,
        expenses: &Amounts,
        comment: &str,
    ) -> Result<InsertOutcome> {
        let record = PeriodRecord::new(key, incomes.clone(), expenses.clone(), comment);
        self.insert_record(&record)
    }

    pub fn insert_record(&self, record: &PeriodRecord) -> Result<InsertOutcome> {
        write_doc(self.conn, record)
    }

    /// Like [`insert`](Self::insert) but refuses a key that is already stored.
    pub fn create(&self, record: &PeriodRecord) -> Result<InsertOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM periods WHERE key=?1 LIMIT 1",
                params![record.key],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(Error::Duplicate(record.key.clone()));
        }
        let outcome = write_doc(&tx, record)?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Replaces every document stored under the record's key.
    pub fn upsert(&self, record: &PeriodRecord) -> Result<InsertOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let replaced = tx.execute("DELETE FROM periods WHERE key=?1", params![record.key])?;
        let mut outcome = write_doc(&tx, record)?;
        tx.commit()?;
        outcome.replaced = replaced;
        if replaced > 0 {
            tracing::info!(key = %record.key, replaced, "replaced period");
        }
        Ok(outcome)
    }

    /// Every stored record in insertion order.
    pub fn list_all(&self) -> Result<Vec<PeriodRecord>> {
        Ok(self
            .list_stored()?
            .into_iter()
            .map(|p| p.record)
            .collect())
    }

    pub fn list_stored(&self) -> Result<Vec<StoredPeriod>> {
        let mut stmt = self.conn.prepare("SELECT id, doc FROM periods ORDER BY id")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            out.push(decode(id, &doc)?);
        }
        Ok(out)
    }

    /// Stored keys in insertion order, duplicates included.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM periods ORDER BY id")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// The earliest document stored under `key`.
    pub fn find_by_key(&self, key: &str) -> Result<Option<PeriodRecord>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, doc FROM periods WHERE key=?1 ORDER BY id LIMIT 1",
                params![key],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        match row {
            Some((id, doc)) => Ok(Some(decode(id, &doc)?.record)),
            None => {
                tracing::debug!(key, "period not found");
                Ok(None)
            }
        }
    }

    /// Same as [`find_by_key`](Self::find_by_key) with absence as an error.
    pub fn get(&self, key: &str) -> Result<PeriodRecord> {
        self.find_by_key(key)?
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    pub fn find_all_by_key(&self, key: &str) -> Result<Vec<StoredPeriod>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, doc FROM periods WHERE key=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![key], |r| {
            Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            out.push(decode(id, &doc)?);
        }
        Ok(out)
    }
}

fn write_doc(conn: &Connection, record: &PeriodRecord) -> Result<InsertOutcome> {
    let doc = serde_json::to_string(record)?;
    let changed = conn.execute(
        "INSERT INTO periods(key, doc) VALUES (?1, ?2)",
        params![record.key, doc],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(key = %record.key, id, changed, "stored period");
    Ok(InsertOutcome {
        id,
        acknowledged: changed == 1,
        replaced: 0,
    })
}

fn decode(id: i64, doc: &str) -> Result<StoredPeriod> {
    let record: PeriodRecord = serde_json::from_str(doc).map_err(|e| {
        tracing::error!(id, error = %e, "undecodable period document");
        Error::Document(e)
    })?;
    Ok(StoredPeriod { id, record })
}
