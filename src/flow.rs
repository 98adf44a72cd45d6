// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income -> "Total Income" -> expense flow graph for Sankey rendering.
//!
//! Nodes are laid out as `[income categories] + [Total Income] + [expense
//! categories]` in schema order. Links refer to nodes by the index each node
//! received when it was pushed, so an expense category sharing a name with an
//! income category still gets its own target.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::CategorySchema;
use crate::models::{Amounts, PeriodRecord};

pub const TOTAL_INCOME: &str = "Total Income";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Income,
    Total,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_income: i64,
    pub total_expense: i64,
    /// Negative when expenses exceed income.
    pub remaining: i64,
}

impl Totals {
    pub fn new(total_income: i64, total_expense: i64) -> Self {
        Self {
            total_income,
            total_expense,
            remaining: total_income - total_expense,
        }
    }
}

fn sum(values: impl Iterator<Item = u32>) -> i64 {
    values.map(i64::from).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub totals: Totals,
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

/// Builds the flow for one period's mappings.
///
/// Categories are taken from `schema`, in schema order. A configured
/// category missing from a mapping counts as 0; mapping entries the schema
/// does not know are left out, so the totals always match the link weights.
pub fn build_flow(schema: &CategorySchema, incomes: &Amounts, expenses: &Amounts) -> Flow {
    let inc = aligned("income", schema.income(), incomes);
    let exp = aligned("expense", schema.expenses(), expenses);

    let mut nodes = Vec::with_capacity(inc.len() + exp.len() + 1);
    let mut links = Vec::with_capacity(inc.len() + exp.len());

    let income_idx: Vec<usize> = inc
        .iter()
        .map(|(label, _)| push_node(&mut nodes, label, NodeKind::Income))
        .collect();
    let total = push_node(&mut nodes, TOTAL_INCOME, NodeKind::Total);
    let expense_idx: Vec<usize> = exp
        .iter()
        .map(|(label, _)| push_node(&mut nodes, label, NodeKind::Expense))
        .collect();

    for (&source, &(_, value)) in income_idx.iter().zip(&inc) {
        links.push(FlowLink {
            source,
            target: total,
            value,
        });
    }
    for (&target, &(_, value)) in expense_idx.iter().zip(&exp) {
        links.push(FlowLink {
            source: total,
            target,
            value,
        });
    }

    let totals = Totals::new(
        sum(inc.iter().map(|(_, v)| *v)),
        sum(exp.iter().map(|(_, v)| *v)),
    );
    Flow {
        totals,
        nodes,
        links,
    }
}

pub fn flow_for(schema: &CategorySchema, record: &PeriodRecord) -> Flow {
    build_flow(schema, &record.incomes, &record.expenses)
}

fn push_node(nodes: &mut Vec<FlowNode>, label: &str, kind: NodeKind) -> usize {
    nodes.push(FlowNode {
        label: label.to_string(),
        kind,
    });
    nodes.len() - 1
}

fn aligned<'a>(group: &str, names: &'a [String], amounts: &Amounts) -> Vec<(&'a str, u32)> {
    names
        .iter()
        .map(|name| {
            let value = amounts.get(name).copied().unwrap_or_else(|| {
                tracing::warn!(category = %name, group, "category missing from record, using 0");
                0
            });
            (name.as_str(), value)
        })
        .collect()
}

impl Flow {
    /// A Plotly `sankey` trace.
    pub fn to_plotly(&self) -> Value {
        let labels: Vec<&str> = self.nodes.iter().map(|n| n.label.as_str()).collect();
        let source: Vec<usize> = self.links.iter().map(|l| l.source).collect();
        let target: Vec<usize> = self.links.iter().map(|l| l.target).collect();
        let value: Vec<u32> = self.links.iter().map(|l| l.value).collect();
        json!({
            "type": "sankey",
            "node": {"label": labels, "pad": 20, "thickness": 30, "color": "#E694FF"},
            "link": {"source": source, "target": target, "value": value},
        })
    }

    /// A full Plotly figure (`data` + `layout`) ready for `Plotly.newPlot`.
    pub fn to_plotly_figure(&self) -> Value {
        json!({
            "data": [self.to_plotly()],
            "layout": {"margin": {"l": 0, "r": 0, "t": 5, "b": 5}},
        })
    }
}
