//! End-to-end dashboard computation: load, fall back, normalize, filter by
//! week, then derive metrics and the segment table.

use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::config::{DashboardConfig, DatasetFiles};
use crate::error::{DashboardError, DashboardResult};
use crate::fallback;
use crate::loader::DatasetLoader;
use crate::metrics::{self, DashboardMetrics, Metric};
use crate::models::{DatasetKind, Datasets};
use crate::risk::{self, RiskSource};
use crate::segments::{self, SegmentBreakdown};
use crate::timestamps::{self, TIMESTAMP_COLUMN};
use crate::weeks::{self, ALL_WEEKS};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DataSource {
    Files { data_dir: PathBuf },
    Demo { missing: Vec<String> },
}

impl DataSource {
    pub fn is_demo(&self) -> bool {
        matches!(self, DataSource::Demo { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub kind: DatasetKind,
    pub rows: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub source: DataSource,
    pub datasets: Vec<DatasetOverview>,
    pub weeks: Vec<String>,
    pub selected_week: String,
    pub risk_source: Option<RiskSource>,
    pub metrics: DashboardMetrics,
    pub segments: Metric<SegmentBreakdown>,
}

/// Loads all four datasets. If any file is absent, the whole demo set
/// replaces them; real and demo tables are never mixed.
pub fn load_datasets(
    loader: &mut DatasetLoader,
    files: &DatasetFiles,
) -> DashboardResult<(Datasets, DataSource)> {
    let churn = loader.load(files.name(DatasetKind::Churn))?;
    let watch = loader.load(files.name(DatasetKind::Watch))?;
    let search = loader.load(files.name(DatasetKind::Search))?;
    let recommend = loader.load(files.name(DatasetKind::Recommend))?;

    match (churn, watch, search, recommend) {
        (Some(churn), Some(watch), Some(search), Some(recommend)) => {
            let source = DataSource::Files {
                data_dir: loader.base_dir().to_path_buf(),
            };
            let datasets = Datasets {
                churn,
                watch,
                search,
                recommend,
            };
            Ok((datasets, source))
        }
        (churn, watch, search, recommend) => {
            let missing: Vec<String> = [
                (DatasetKind::Churn, churn.is_none()),
                (DatasetKind::Watch, watch.is_none()),
                (DatasetKind::Search, search.is_none()),
                (DatasetKind::Recommend, recommend.is_none()),
            ]
            .into_iter()
            .filter(|(_, absent)| *absent)
            .map(|(kind, _)| files.name(kind).to_string())
            .collect();
            warn!(
                "missing datasets under {}: {}; running in demo mode",
                loader.base_dir().display(),
                missing.join(", ")
            );
            Ok((fallback::demo_datasets(), DataSource::Demo { missing }))
        }
    }
}

pub fn normalize_datasets(datasets: &mut Datasets) {
    for kind in DatasetKind::ALL.into_iter().filter(DatasetKind::is_time_bearing) {
        timestamps::normalize_in_place(datasets.get_mut(kind), TIMESTAMP_COLUMN);
    }
}

/// Computes the dashboard from already loaded datasets.
pub fn build_dashboard(
    mut datasets: Datasets,
    source: DataSource,
    config: &DashboardConfig,
    selected_week: &str,
) -> DashboardResult<Dashboard> {
    normalize_datasets(&mut datasets);

    let week_list = weeks::derive_weeks(&datasets.watch, config.week_start);
    if !week_list.iter().any(|w| w == selected_week) {
        return Err(DashboardError::UnknownWeek {
            week: selected_week.to_string(),
            available: week_list,
        });
    }
    let watch = weeks::filter_by_week(&datasets.watch, selected_week, config.week_start);
    info!(
        "week '{selected_week}' selects {} of {} watch rows",
        watch.len(),
        datasets.watch.len()
    );

    let labels = risk::derive_risk_labels(&datasets.churn, config.risk_threshold);
    let metrics = metrics::compute_metrics(labels.as_ref(), &watch);
    let segments = segments::aggregate_segments(&datasets.churn, labels.as_ref());

    let overview = DatasetKind::ALL
        .into_iter()
        .map(|kind| {
            let table = datasets.get(kind);
            DatasetOverview {
                kind,
                rows: table.len(),
                columns: table.columns().to_vec(),
            }
        })
        .collect();

    Ok(Dashboard {
        source,
        datasets: overview,
        weeks: week_list,
        selected_week: selected_week.to_string(),
        risk_source: labels.map(|l| l.source),
        metrics,
        segments,
    })
}

pub fn run(
    config: &DashboardConfig,
    loader: &mut DatasetLoader,
    selected_week: Option<&str>,
) -> DashboardResult<Dashboard> {
    let (datasets, source) = load_datasets(loader, &config.files)?;
    build_dashboard(
        datasets,
        source,
        config,
        selected_week.unwrap_or(ALL_WEEKS),
    )
}
