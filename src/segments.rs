use std::collections::BTreeMap;

use serde::Serialize;

use crate::columns::{self, SEGMENT_COLUMNS};
use crate::metrics::Metric;
use crate::models::{CellKey, Table};
use crate::risk::RiskLabels;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: CellKey,
    pub user_count: usize,
    pub risk_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentBreakdown {
    /// Name of the churn column the rows were grouped by.
    pub column: &'static str,
    pub rows: Vec<SegmentSummary>,
}

/// Groups churn rows by the detected segment column, ascending by segment
/// value. Rows with a missing segment are left out of every group.
pub fn aggregate_segments(churn: &Table, labels: Option<&RiskLabels>) -> Metric<SegmentBreakdown> {
    let (Some(column), Some(labels)) = (columns::resolve(churn, SEGMENT_COLUMNS), labels) else {
        return Metric::unavailable("no segment column or risk label");
    };

    let mut groups: BTreeMap<CellKey, (usize, usize)> = BTreeMap::new();
    for (cell, &label) in churn.column_values(column.index).zip(labels.labels.iter()) {
        let Some(key) = cell.key() else {
            continue;
        };
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += usize::from(label);
    }

    let rows = groups
        .into_iter()
        .map(|(segment, (user_count, at_risk))| SegmentSummary {
            segment,
            user_count,
            risk_ratio: at_risk as f64 / user_count as f64,
        })
        .collect();

    Metric::available(SegmentBreakdown {
        column: column.name,
        rows,
    })
}
