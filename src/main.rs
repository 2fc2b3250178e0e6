use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use churn_watch_dashboard::config::{self, DashboardConfig, WeekStart};
use churn_watch_dashboard::loader::DatasetLoader;
use churn_watch_dashboard::{pipeline, report};

#[derive(Parser)]
#[command(name = "churn-dashboard")]
#[command(about = "Sports subscriber churn risk dashboard over local CSV exports", long_about = None)]
struct Cli {
    /// Directory holding the dataset CSV files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    churn_file: Option<String>,
    #[arg(long, global = true)]
    watch_file: Option<String>,
    #[arg(long, global = true)]
    search_file: Option<String>,
    #[arg(long, global = true)]
    recommend_file: Option<String>,
    /// Risk score at or above which a user counts as at risk
    #[arg(long, global = true, value_parser = parse_threshold)]
    threshold: Option<f64>,
    /// Week label to restrict watch metrics to (see `weeks`)
    #[arg(long, global = true)]
    week: Option<String>,
    #[arg(long, global = true, value_enum)]
    week_start: Option<WeekStart>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metric cards and the segment table
    Summary,
    /// List selectable week labels
    Weeks,
    /// Print the segment breakdown only
    Segments,
    /// Write a markdown report
    Report {
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Print the full dashboard as JSON
    Json,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    config::validate_threshold(value).map_err(|e| e.to_string())
}

impl Cli {
    fn dashboard_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = DashboardConfig::from_env();
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(name) = &self.churn_file {
            config.files.churn = name.clone();
        }
        if let Some(name) = &self.watch_file {
            config.files.watch = name.clone();
        }
        if let Some(name) = &self.search_file {
            config.files.search = name.clone();
        }
        if let Some(name) = &self.recommend_file {
            config.files.recommend = name.clone();
        }
        if let Some(week_start) = self.week_start {
            config.week_start = week_start;
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold)?;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.dashboard_config()?;
    let mut loader = DatasetLoader::new(&config.data_dir);
    let dashboard = pipeline::run(&config, &mut loader, cli.week.as_deref())
        .with_context(|| format!("failed to build dashboard from {}", config.data_dir.display()))?;

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => {
            print!("{}", report::render_summary(&dashboard));
        }
        Commands::Weeks => {
            for week in dashboard.weeks.iter() {
                println!("{week}");
            }
        }
        Commands::Segments => {
            print!("{}", report::render_segments(&dashboard.segments));
        }
        Commands::Report { out } => {
            std::fs::write(&out, report::build_report(&dashboard))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_override_defaults() {
        let cli = Cli::parse_from([
            "churn-dashboard",
            "--data-dir",
            "/tmp/exports",
            "--threshold",
            "0.55",
            "--week-start",
            "monday",
            "report",
            "--watch-file",
            "views.csv",
        ]);
        let config = cli.dashboard_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.risk_threshold, 0.55);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.files.watch, "views.csv");
        assert_eq!(config.files.churn, "churn_final_data.csv");
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let parsed = Cli::try_parse_from(["churn-dashboard", "--threshold", "1.5"]);
        assert!(parsed.is_err());
    }
}
