use log::debug;

use crate::models::Table;

pub const USER_ID_COLUMNS: &[&str] = &["user_id"];
pub const RISK_SCORE_COLUMNS: &[&str] = &["churn_risk_score"];
pub const CHURN_FLAG_COLUMNS: &[&str] = &["churn_status"];
pub const WATCH_TIME_COLUMNS: &[&str] = &[
    "watch_duration_minutes",
    "watch_minutes",
    "watch_hours",
    "watch_time",
];
pub const SEGMENT_COLUMNS: &[&str] = &["segment", "sports_segment", "user_segment"];

/// A column found in a particular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundColumn {
    pub name: &'static str,
    pub index: usize,
}

/// First candidate, in priority order, that names a column of `table`.
pub fn resolve(table: &Table, candidates: &[&'static str]) -> Option<BoundColumn> {
    let bound = candidates.iter().find_map(|&name| {
        table
            .column_index(name)
            .map(|index| BoundColumn { name, index })
    });
    match bound {
        Some(column) => debug!("resolved column '{}' at {}", column.name, column.index),
        None => debug!("none of {candidates:?} present"),
    }
    bound
}
