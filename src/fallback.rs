use chrono::NaiveDate;

use crate::models::{Cell, Datasets, Table};

fn february_2026(day: u32) -> Cell {
    NaiveDate::from_ymd_opt(2026, 2, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(Cell::Missing, Cell::Timestamp)
}

/// Fixed demo data used when any of the real dataset files is missing.
pub fn demo_datasets() -> Datasets {
    let churn = Table::from_rows(
        &["user_id", "churn_status"],
        vec![
            vec![Cell::Number(1.0), Cell::Number(0.0)],
            vec![Cell::Number(2.0), Cell::Number(1.0)],
            vec![Cell::Number(3.0), Cell::Number(0.0)],
        ],
    );

    let watch = Table::from_rows(
        &["user_id", "timestamp", "watch_duration_minutes"],
        vec![
            vec![Cell::Number(1.0), february_2026(1), Cell::Number(30.0)],
            vec![Cell::Number(2.0), february_2026(2), Cell::Number(10.0)],
            vec![Cell::Number(3.0), february_2026(3), Cell::Number(50.0)],
        ],
    );

    let search = Table::from_rows(
        &["user_id", "timestamp"],
        vec![vec![Cell::Number(1.0), february_2026(1)]],
    );

    let recommend = Table::from_rows(
        &["user_id", "timestamp"],
        vec![vec![Cell::Number(1.0), february_2026(1)]],
    );

    Datasets {
        churn,
        watch,
        search,
        recommend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_set_has_expected_shape() {
        let demo = demo_datasets();
        assert_eq!(demo.churn.len(), 3);
        assert_eq!(demo.watch.len(), 3);
        assert_eq!(demo.search.len(), 1);
        assert_eq!(demo.recommend.len(), 1);
    }

    #[test]
    fn churn_flags_alternate() {
        let demo = demo_datasets();
        let flags: Vec<f64> = demo
            .churn
            .column_values(1)
            .filter_map(Cell::as_f64)
            .collect();
        assert_eq!(flags, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn watch_timestamps_are_distinct_and_parsed() {
        let demo = demo_datasets();
        let mut stamps: Vec<_> = demo
            .watch
            .column_values(1)
            .filter_map(Cell::as_timestamp)
            .collect();
        stamps.dedup();
        assert_eq!(stamps.len(), 3);
    }

    #[test]
    fn demo_set_is_deterministic() {
        assert_eq!(demo_datasets(), demo_datasets());
    }
}
