//! Week buckets for the watch dataset.
//!
//! A bucket label is `"<first-day>/<last-day>"`, e.g. `2026-02-01/2026-02-07`,
//! so sorting labels as strings sorts them chronologically.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::config::WeekStart;
use crate::models::Table;
use crate::timestamps::TIMESTAMP_COLUMN;

pub const ALL_WEEKS: &str = "all";

/// Bucket label for `ts`. [`WeekStart::Sunday`] is the configured default;
/// pass [`WeekStart::Monday`] for ISO-8601 weeks.
pub fn week_label(ts: NaiveDateTime, week_start: WeekStart) -> String {
    let date = ts.date();
    let offset = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    let first = date - Duration::days(i64::from(offset));
    let last = first + Duration::days(6);
    format!("{first}/{last}")
}

/// Week bucket per row, `None` where the timestamp is missing. Returns
/// `None` overall when the table has no timestamp column.
fn row_weeks(watch: &Table, week_start: WeekStart) -> Option<Vec<Option<String>>> {
    let index = watch.column_index(TIMESTAMP_COLUMN)?;
    Some(
        watch
            .column_values(index)
            .map(|cell| cell.as_timestamp().map(|ts| week_label(ts, week_start)))
            .collect(),
    )
}

/// `["all"]` followed by the sorted distinct week buckets present.
pub fn derive_weeks(watch: &Table, week_start: WeekStart) -> Vec<String> {
    let mut labels = vec![ALL_WEEKS.to_string()];
    if let Some(weeks) = row_weeks(watch, week_start) {
        let distinct: BTreeSet<String> = weeks.into_iter().flatten().collect();
        labels.extend(distinct);
    }
    labels
}

/// Restricts `watch` to rows in `selection`. `"all"`, or a table without a
/// timestamp column, yields the table unchanged.
pub fn filter_by_week(watch: &Table, selection: &str, week_start: WeekStart) -> Table {
    if selection == ALL_WEEKS {
        return watch.clone();
    }
    let Some(weeks) = row_weeks(watch, week_start) else {
        return watch.clone();
    };

    let mut buckets = weeks.into_iter();
    watch.filter_rows(|_| {
        matches!(buckets.next(), Some(Some(ref week)) if week == selection)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use crate::timestamps::parse_timestamp;

    fn watch_table(stamps: &[&str]) -> Table {
        let rows = stamps
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let ts = parse_timestamp(raw).map_or(Cell::Missing, Cell::Timestamp);
                vec![Cell::Number(i as f64 + 1.0), ts]
            })
            .collect();
        Table::from_rows(&["user_id", "timestamp"], rows)
    }

    #[test]
    fn sunday_weeks_group_first_two_days_of_february() {
        let sunday = parse_timestamp("2026-02-01").unwrap();
        let monday = parse_timestamp("2026-02-02").unwrap();
        let next_sunday = parse_timestamp("2026-02-08").unwrap();

        assert_eq!(week_label(sunday, WeekStart::Sunday), "2026-02-01/2026-02-07");
        assert_eq!(
            week_label(sunday, WeekStart::Sunday),
            week_label(monday, WeekStart::Sunday)
        );
        assert_eq!(
            week_label(next_sunday, WeekStart::Sunday),
            "2026-02-08/2026-02-14"
        );
    }

    #[test]
    fn monday_weeks_follow_iso_boundaries() {
        let sunday = parse_timestamp("2026-02-01").unwrap();
        let monday = parse_timestamp("2026-02-02").unwrap();

        assert_eq!(week_label(sunday, WeekStart::Monday), "2026-01-26/2026-02-01");
        assert_eq!(week_label(monday, WeekStart::Monday), "2026-02-02/2026-02-08");
    }

    #[test]
    fn derive_weeks_is_all_plus_sorted_distinct() {
        let watch = watch_table(&["2026-02-08", "2026-02-01", "2026-02-02", "garbage"]);
        let weeks = derive_weeks(&watch, WeekStart::Sunday);
        assert_eq!(
            weeks,
            vec!["all", "2026-02-01/2026-02-07", "2026-02-08/2026-02-14"]
        );
    }

    #[test]
    fn no_timestamp_column_degenerates_to_all() {
        let watch = Table::from_rows(&["user_id"], vec![vec![Cell::Number(1.0)]]);
        assert_eq!(derive_weeks(&watch, WeekStart::Sunday), vec!["all"]);
        assert_eq!(
            filter_by_week(&watch, "2026-02-01/2026-02-07", WeekStart::Sunday),
            watch
        );
    }

    #[test]
    fn all_is_identity() {
        let watch = watch_table(&["2026-02-01", "oops", "2026-02-08"]);
        assert_eq!(filter_by_week(&watch, ALL_WEEKS, WeekStart::Sunday), watch);
    }

    #[test]
    fn selecting_a_week_drops_other_and_missing_rows() {
        let watch = watch_table(&["2026-02-01", "oops", "2026-02-02", "2026-02-08"]);
        let filtered = filter_by_week(&watch, "2026-02-01/2026-02-07", WeekStart::Sunday);

        let users: Vec<f64> = filtered.column_values(0).filter_map(Cell::as_f64).collect();
        assert_eq!(users, vec![1.0, 3.0]);
    }
}
