use std::collections::BTreeSet;

use serde::Serialize;

use crate::columns::{self, USER_ID_COLUMNS, WATCH_TIME_COLUMNS};
use crate::models::{Cell, CellKey, Table};
use crate::risk::RiskLabels;

/// A computed value, or an explicit marker that the inputs cannot support it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Metric<T> {
    Available { value: T },
    Unavailable { reason: &'static str },
}

impl<T> Metric<T> {
    pub fn available(value: T) -> Self {
        Metric::Available { value }
    }

    pub fn unavailable(reason: &'static str) -> Self {
        Metric::Unavailable { reason }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Metric::Available { value } => Some(value),
            Metric::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Available { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub risk_ratio: Metric<f64>,
    pub active_users: Metric<usize>,
    pub average_watch: Metric<f64>,
}

pub fn risk_ratio(labels: Option<&RiskLabels>) -> Metric<f64> {
    let Some(labels) = labels else {
        return Metric::unavailable("no risk column");
    };
    match labels.ratio() {
        Some(ratio) => Metric::available(ratio),
        None => Metric::unavailable("no churn rows"),
    }
}

/// Distinct non-missing user ids in `watch`.
pub fn active_users(watch: &Table) -> Metric<usize> {
    let Some(column) = columns::resolve(watch, USER_ID_COLUMNS) else {
        return Metric::unavailable("no user_id column");
    };
    let users: BTreeSet<CellKey> = watch
        .column_values(column.index)
        .filter_map(Cell::key)
        .collect();
    Metric::available(users.len())
}

/// Mean of the first watch-time column present, skipping non-numeric cells.
pub fn average_watch(watch: &Table) -> Metric<f64> {
    let Some(column) = columns::resolve(watch, WATCH_TIME_COLUMNS) else {
        return Metric::unavailable("no watch-time column");
    };

    let (sum, count) = watch
        .column_values(column.index)
        .filter_map(Cell::as_f64)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return Metric::unavailable("no numeric watch-time values");
    }
    Metric::available(sum / count as f64)
}

pub fn compute_metrics(labels: Option<&RiskLabels>, watch: &Table) -> DashboardMetrics {
    DashboardMetrics {
        risk_ratio: risk_ratio(labels),
        active_users: active_users(watch),
        average_watch: average_watch(watch),
    }
}
