use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::models::DatasetKind;

pub const DATA_DIR_ENV: &str = "CHURN_DASHBOARD_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data/raw";
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.7;

/// First day of a week bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetFiles {
    pub churn: String,
    pub watch: String,
    pub search: String,
    pub recommend: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            churn: "churn_final_data.csv".to_string(),
            watch: "watch_data.csv".to_string(),
            search: "search_data.csv".to_string(),
            recommend: "recommend_data.csv".to_string(),
        }
    }
}

impl DatasetFiles {
    pub fn name(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Churn => &self.churn,
            DatasetKind::Watch => &self.watch,
            DatasetKind::Search => &self.search,
            DatasetKind::Recommend => &self.recommend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub files: DatasetFiles,
    pub risk_threshold: f64,
    pub week_start: WeekStart,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            files: DatasetFiles::default(),
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            week_start: WeekStart::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults with the data directory taken from the environment when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        config
    }

    pub fn with_threshold(mut self, threshold: f64) -> DashboardResult<Self> {
        self.risk_threshold = validate_threshold(threshold)?;
        Ok(self)
    }
}

pub fn validate_threshold(threshold: f64) -> DashboardResult<f64> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(DashboardError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_layout() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data/raw"));
        assert_eq!(config.files.name(DatasetKind::Watch), "watch_data.csv");
        assert_eq!(config.risk_threshold, 0.7);
        assert_eq!(config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert_eq!(validate_threshold(0.0).unwrap(), 0.0);
        assert_eq!(validate_threshold(1.0).unwrap(), 1.0);
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn with_threshold_rejects_out_of_range() {
        let err = DashboardConfig::default().with_threshold(2.0).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidThreshold(t) if t == 2.0));
    }
}
