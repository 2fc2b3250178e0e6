use log::debug;
use serde::Serialize;

use crate::columns::{self, BoundColumn, CHURN_FLAG_COLUMNS, RISK_SCORE_COLUMNS};
use crate::models::{Cell, Table};

/// Where the per-user risk label came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskSource {
    Score {
        column: &'static str,
        threshold: f64,
    },
    Flag {
        column: &'static str,
    },
}

/// One `is_risk` value (0 or 1) per churn row, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskLabels {
    pub source: RiskSource,
    pub labels: Vec<u8>,
}

impl RiskLabels {
    /// Share of rows labelled at risk; `None` for an empty table.
    pub fn ratio(&self) -> Option<f64> {
        mean_label(&self.labels)
    }
}

pub fn mean_label(labels: &[u8]) -> Option<f64> {
    if labels.is_empty() {
        return None;
    }
    let at_risk: usize = labels.iter().map(|&l| usize::from(l)).sum();
    Some(at_risk as f64 / labels.len() as f64)
}

/// Missing or non-numeric scores never count as at risk.
pub fn score_label(cell: &Cell, threshold: f64) -> u8 {
    match cell.as_f64() {
        Some(score) if score >= threshold => 1,
        _ => 0,
    }
}

pub fn flag_label(cell: &Cell) -> u8 {
    match cell {
        Cell::Number(value) => u8::from(*value != 0.0),
        Cell::Text(value) => {
            let value = value.to_ascii_lowercase();
            u8::from(matches!(value.as_str(), "true" | "yes" | "y" | "t"))
        }
        Cell::Missing | Cell::Timestamp(_) => 0,
    }
}

/// Risk labels from a continuous score when present, else from a churn flag.
/// `None` when the churn table has neither column.
pub fn derive_risk_labels(churn: &Table, threshold: f64) -> Option<RiskLabels> {
    if let Some(BoundColumn { name, index }) = columns::resolve(churn, RISK_SCORE_COLUMNS) {
        let labels = churn
            .column_values(index)
            .map(|cell| score_label(cell, threshold))
            .collect();
        return Some(RiskLabels {
            source: RiskSource::Score {
                column: name,
                threshold,
            },
            labels,
        });
    }

    if let Some(BoundColumn { name, index }) = columns::resolve(churn, CHURN_FLAG_COLUMNS) {
        let labels = churn.column_values(index).map(flag_label).collect();
        return Some(RiskLabels {
            source: RiskSource::Flag { column: name },
            labels,
        });
    }

    debug!("churn table has no risk column; risk labels undefined");
    None
}
