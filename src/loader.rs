use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{Cell, Table};

/// Reads named CSV datasets from a base directory.
///
/// Results are memoized per file name for the lifetime of the loader, so a
/// file is read at most once even when it turns out to be absent.
#[derive(Debug)]
pub struct DatasetLoader {
    base_dir: PathBuf,
    cache: HashMap<String, Option<Table>>,
    reads: usize,
}

impl DatasetLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: HashMap::new(),
            reads: 0,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns `Ok(None)` when the file does not exist. A file that exists
    /// but cannot be parsed is an error.
    pub fn load(&mut self, name: &str) -> DashboardResult<Option<Table>> {
        if let Some(cached) = self.cache.get(name) {
            debug!("dataset cache hit for {name}");
            return Ok(cached.clone());
        }

        let path = self.base_dir.join(name);
        let table = if path.exists() {
            self.reads += 1;
            let table = read_table(&path)?;
            info!(
                "loaded {} rows x {} columns from {}",
                table.len(),
                table.columns().len(),
                path.display()
            );
            Some(table)
        } else {
            debug!("dataset {} not found", path.display());
            None
        };

        self.cache.insert(name.to_string(), table.clone());
        Ok(table)
    }

    /// Number of files actually read from disk.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

pub fn read_table(path: &Path) -> DashboardResult<Table> {
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = |source| DashboardError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    // Short rows are padded with missing cells; rows with extra fields are rejected.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let columns: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();
    let expected = columns.len();

    let mut table = Table::new(columns);
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        if record.len() > expected {
            return Err(DashboardError::ExtraFields {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected,
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(Cell::parse).collect());
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn missing_file_is_absent_not_error() {
        let dir = TempDir::new().unwrap();
        let mut loader = DatasetLoader::new(dir.path());
        assert!(loader.load("watch_data.csv").unwrap().is_none());
        assert_eq!(loader.reads(), 0);
    }

    #[test]
    fn reads_headers_and_typed_cells() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "churn.csv",
            "user_id,churn_status,segment\n1,0,casual\n2,1,\n",
        );
        let mut loader = DatasetLoader::new(dir.path());
        let table = loader.load("churn.csv").unwrap().unwrap();

        assert_eq!(table.columns(), ["user_id", "churn_status", "segment"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][2], Cell::text("casual"));
        assert_eq!(table.rows()[1][1], Cell::Number(1.0));
        assert_eq!(table.rows()[1][2], Cell::Missing);
    }

    #[test]
    fn repeated_loads_hit_the_cache() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "search.csv", "user_id,timestamp\n1,2026-02-01\n");
        let mut loader = DatasetLoader::new(dir.path());

        let first = loader.load("search.csv").unwrap();
        std::fs::remove_file(dir.path().join("search.csv")).unwrap();
        let second = loader.load("search.csv").unwrap();

        assert_eq!(first, second);
        assert_eq!(loader.reads(), 1);
    }

    #[test]
    fn extra_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "watch.csv", "user_id,timestamp\n1,2026-02-01,extra\n");
        let mut loader = DatasetLoader::new(dir.path());

        let err = loader.load("watch.csv").unwrap_err();
        assert!(matches!(
            err,
            DashboardError::ExtraFields {
                line: 2,
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "watch.csv",
            "user_id,timestamp,watch_minutes\n1,2026-02-01,30\n2,2026-02-02\n",
        );
        let mut loader = DatasetLoader::new(dir.path());

        let table = loader.load("watch.csv").unwrap().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], Cell::Number(2.0));
        assert_eq!(table.rows()[1][2], Cell::Missing);
    }

    #[test]
    fn header_names_are_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "churn.csv", "user_id, segment\n1,casual\n");
        let mut loader = DatasetLoader::new(dir.path());

        let table = loader.load("churn.csv").unwrap().unwrap();

        assert_eq!(table.columns(), ["user_id", " segment"]);
        assert!(!table.has_column("segment"));
    }
}
