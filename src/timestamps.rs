//! Coercion of a text column into date-times.
//!
//! Values that do not parse become [`Cell::Missing`]; the row itself is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::models::{Cell, Table};

pub const TIMESTAMP_COLUMN: &str = "timestamp";

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn coerce(cell: &Cell) -> Cell {
    match cell {
        Cell::Timestamp(ts) => Cell::Timestamp(*ts),
        Cell::Text(raw) => parse_timestamp(raw).map_or(Cell::Missing, Cell::Timestamp),
        Cell::Number(_) | Cell::Missing => Cell::Missing,
    }
}

/// Converts `column` in place, returning how many non-missing values could
/// not be parsed. A table without the column is left untouched.
pub fn normalize_in_place(table: &mut Table, column: &str) -> usize {
    let Some(index) = table.column_index(column) else {
        return 0;
    };

    let mut unparsed = 0;
    table.map_column(index, |cell| {
        let coerced = coerce(cell);
        if coerced.is_missing() && !cell.is_missing() {
            unparsed += 1;
        }
        coerced
    });

    if unparsed > 0 {
        debug!("{unparsed} values in column '{column}' could not be parsed as timestamps");
    }
    unparsed
}

pub fn normalize(table: Option<Table>, column: &str) -> Option<Table> {
    table.map(|mut table| {
        normalize_in_place(&mut table, column);
        table
    })
}
