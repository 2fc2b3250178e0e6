use std::fmt::Write;

use crate::metrics::Metric;
use crate::pipeline::{Dashboard, DataSource};
use crate::risk::RiskSource;
use crate::segments::SegmentBreakdown;

pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn format_decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Integer with comma thousands separators.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render_metric<T>(metric: &Metric<T>, format: impl Fn(&T) -> String) -> String {
    match metric {
        Metric::Available { value } => format(value),
        Metric::Unavailable { reason } => format!("unavailable ({reason})"),
    }
}

fn risk_caption(source: Option<&RiskSource>) -> String {
    match source {
        Some(RiskSource::Score { column, threshold }) => {
            format!("{column} >= {threshold:.2}")
        }
        Some(RiskSource::Flag { column }) => column.to_string(),
        None => "none".to_string(),
    }
}

fn source_caption(source: &DataSource) -> String {
    match source {
        DataSource::Files { data_dir } => format!("files under {}", data_dir.display()),
        DataSource::Demo { missing } => {
            format!("demo data (missing: {})", missing.join(", "))
        }
    }
}

fn metric_lines(dashboard: &Dashboard) -> [(&'static str, String); 3] {
    let metrics = &dashboard.metrics;
    [
        (
            "Risk ratio",
            render_metric(&metrics.risk_ratio, |r| format_percent(*r)),
        ),
        (
            "Active users (watch)",
            render_metric(&metrics.active_users, |n| format_count(*n)),
        ),
        (
            "Average watch volume",
            render_metric(&metrics.average_watch, |v| format_decimal(*v)),
        ),
    ]
}

/// Plain-text segment table for the terminal.
pub fn render_segments(segments: &Metric<SegmentBreakdown>) -> String {
    let mut output = String::new();
    match segments {
        Metric::Available { value } => {
            let width = value
                .rows
                .iter()
                .map(|r| r.segment.to_string().len())
                .chain(std::iter::once(value.column.len()))
                .max()
                .unwrap_or(0);
            let _ = writeln!(
                output,
                "{:<width$}  {:>10}  {:>10}",
                value.column, "user_count", "risk_ratio"
            );
            for row in value.rows.iter() {
                let _ = writeln!(
                    output,
                    "{:<width$}  {:>10}  {:>10}",
                    row.segment.to_string(),
                    format_count(row.user_count),
                    format_percent(row.risk_ratio)
                );
            }
        }
        Metric::Unavailable { reason } => {
            let _ = writeln!(output, "Segment breakdown not shown: {reason}.");
        }
    }
    output
}

pub fn render_summary(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    if dashboard.source.is_demo() {
        let _ = writeln!(output, "WARNING: dataset files missing, showing demo data.");
    }
    let _ = writeln!(output, "Source: {}", source_caption(&dashboard.source));
    let _ = writeln!(output, "Week: {}", dashboard.selected_week);
    let _ = writeln!(
        output,
        "Risk label: {}",
        risk_caption(dashboard.risk_source.as_ref())
    );
    let _ = writeln!(output);

    for (label, value) in metric_lines(dashboard) {
        let _ = writeln!(output, "{label:<22} {value}");
    }

    let _ = writeln!(output);
    output.push_str(&render_segments(&dashboard.segments));
    output
}

pub fn build_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sports Churn Risk Dashboard");
    let _ = writeln!(
        output,
        "Generated from {} for week `{}`",
        source_caption(&dashboard.source),
        dashboard.selected_week
    );
    if dashboard.source.is_demo() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "> Dataset files were missing, so this report uses demo data."
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    for (label, value) in metric_lines(dashboard) {
        let _ = writeln!(output, "- {label}: {value}");
    }
    let _ = writeln!(
        output,
        "- Risk label source: {}",
        risk_caption(dashboard.risk_source.as_ref())
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Segments");
    match &dashboard.segments {
        Metric::Available { value } => {
            let _ = writeln!(output, "| {} | user_count | risk_ratio |", value.column);
            let _ = writeln!(output, "|---|---:|---:|");
            for row in value.rows.iter() {
                let _ = writeln!(
                    output,
                    "| {} | {} | {} |",
                    row.segment,
                    format_count(row.user_count),
                    format_percent(row.risk_ratio)
                );
            }
        }
        Metric::Unavailable { reason } => {
            let _ = writeln!(output, "Not shown: {reason}.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Data Sources");
    for dataset in dashboard.datasets.iter() {
        let _ = writeln!(
            output,
            "- {}: {} rows ({})",
            dataset.kind.label(),
            format_count(dataset.rows),
            dataset.columns.join(", ")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Available Weeks");
    for week in dashboard.weeks.iter() {
        let _ = writeln!(output, "- {week}");
    }

    output
}
