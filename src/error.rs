use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed table in {}: {source}", .path.display())]
    Malformed { path: PathBuf, source: csv::Error },

    #[error(
        "{} line {line}: expected {expected} fields, found {found}",
        .path.display()
    )]
    ExtraFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("risk threshold must be within [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),

    #[error("unknown week '{week}' (available: {})", .available.join(", "))]
    UnknownWeek {
        week: String,
        available: Vec<String>,
    },
}

pub type DashboardResult<T> = Result<T, DashboardError>;
