//! Churn risk dashboard over four local CSV exports: subscriber churn,
//! watch history, search activity and recommendation activity.
//!
//! [`pipeline::run`] loads the datasets, substitutes demo data if any file is
//! missing, and derives the metrics shown by the `churn-dashboard` binary.

pub mod columns;
pub mod config;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod segments;
pub mod timestamps;
pub mod weeks;
