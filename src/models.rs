use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Raw strings pandas-style readers treat as null.
const NULL_MARKERS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "NaT"];

/// A single value in a loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Infers a cell from a raw CSV field: null markers, then numbers, then text.
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if NULL_MARKERS.contains(&trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Cell::Number(value),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Grouping key for distinct counts and group-by; missing cells have none.
    pub fn key(&self) -> Option<CellKey> {
        match self {
            Cell::Missing => None,
            Cell::Number(value) => Some(CellKey::Number(*value)),
            Cell::Text(value) => Some(CellKey::Text(value.clone())),
            Cell::Timestamp(ts) => Some(CellKey::Timestamp(*ts)),
        }
    }
}

/// Totally ordered, hashable-by-order view of a non-missing [`Cell`].
///
/// Numbers sort before text, text before timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellKey {
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl CellKey {
    fn rank(&self) -> u8 {
        match self {
            CellKey::Number(_) => 0,
            CellKey::Text(_) => 1,
            CellKey::Timestamp(_) => 2,
        }
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Number(a), CellKey::Number(b)) => a.total_cmp(b),
            (CellKey::Text(a), CellKey::Text(b)) => a.cmp(b),
            (CellKey::Timestamp(a), CellKey::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellKey::Number(value) => write!(f, "{value}"),
            CellKey::Text(value) => f.write_str(value),
            CellKey::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Row-oriented table with named columns. The column set is whatever the
/// source file carried.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding with missing cells or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn map_column<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        for row in self.rows.iter_mut() {
            row[index] = f(&row[index]);
        }
    }

    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.as_slice()))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Churn,
    Watch,
    Search,
    Recommend,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Churn,
        DatasetKind::Watch,
        DatasetKind::Search,
        DatasetKind::Recommend,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Churn => "churn",
            DatasetKind::Watch => "watch",
            DatasetKind::Search => "search",
            DatasetKind::Recommend => "recommend",
        }
    }

    pub fn is_time_bearing(&self) -> bool {
        !matches!(self, DatasetKind::Churn)
    }
}

/// The four working tables the dashboard is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub churn: Table,
    pub watch: Table,
    pub search: Table,
    pub recommend: Table,
}

impl Datasets {
    pub fn get(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::Churn => &self.churn,
            DatasetKind::Watch => &self.watch,
            DatasetKind::Search => &self.search,
            DatasetKind::Recommend => &self.recommend,
        }
    }

    pub fn get_mut(&mut self, kind: DatasetKind) -> &mut Table {
        match kind {
            DatasetKind::Churn => &mut self.churn,
            DatasetKind::Watch => &mut self.watch,
            DatasetKind::Search => &mut self.search,
            DatasetKind::Recommend => &mut self.recommend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_numbers_text_and_nulls() {
        assert_eq!(Cell::parse(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::parse("0.75"), Cell::Number(0.75));
        assert_eq!(Cell::parse("u-001"), Cell::text("u-001"));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("NaN"), Cell::Missing);
        assert_eq!(Cell::parse("inf"), Cell::text("inf"));
    }

    #[test]
    fn keys_order_numbers_before_text() {
        let mut keys = vec![
            CellKey::Text("b".to_string()),
            CellKey::Number(10.0),
            CellKey::Text("a".to_string()),
            CellKey::Number(2.0),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["2", "10", "a", "b"]);
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut table = Table::new(vec!["user_id".to_string(), "segment".to_string()]);
        table.push_row(vec![Cell::Number(1.0)]);
        assert_eq!(table.rows()[0], vec![Cell::Number(1.0), Cell::Missing]);
    }

    #[test]
    fn filter_rows_keeps_columns() {
        let table = Table::from_rows(
            &["user_id"],
            vec![vec![Cell::Number(1.0)], vec![Cell::Number(2.0)]],
        );
        let filtered = table.filter_rows(|row| row[0] == Cell::Number(2.0));
        assert_eq!(filtered.columns(), table.columns());
        assert_eq!(filtered.len(), 1);
    }
}
