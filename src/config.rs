//! Command-line configuration and process bootstrap.

use crate::data::loader::DEFAULT_DATA_FILE;
use crate::data::range::{parse_iso_date, DateRange, DateSelection};
use crate::stats::WindScope;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bikeshare_dashboard")]
#[command(about = "Bike sharing usage dashboard", long_about = None, version)]
pub struct Cli {
    /// Cleaned dataset CSV (defaults to df_cleaned.csv next to the executable)
    #[arg(long, env = "BIKESHARE_DATA", value_name = "CSV", global = true)]
    pub data: Option<PathBuf>,

    /// First day of the date filter (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date_arg, global = true)]
    pub start: Option<NaiveDate>,

    /// Last day of the date filter (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date_arg, global = true)]
    pub end: Option<NaiveDate>,

    /// Rows feeding the wind chart: the whole dataset or only the filtered range
    #[arg(long, default_value_t = WindScope::Dataset, global = true)]
    pub wind_scope: WindScope,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the interactive dashboard window (default)
    Gui,
    /// Print the dashboard data as JSON
    Report {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Render the four charts to PNG files
    Export {
        /// Directory for the PNG files
        #[arg(short, long, default_value = "charts")]
        out_dir: PathBuf,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 720)]
        height: u32,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Gui)
    }

    /// Dataset location: `--data`/`BIKESHARE_DATA`, else next to the running executable.
    pub fn data_path(&self) -> PathBuf {
        let exe = std::env::current_exe().ok();
        resolve_data_path(self.data.as_deref(), exe.as_deref())
    }

    /// Date selection from `--start`/`--end`, defaulting to the dataset's full extent.
    pub fn selection(&self, extent: Option<DateRange>) -> DateSelection {
        match (self.start, self.end) {
            (None, None) => extent.map(DateSelection::from).unwrap_or(DateSelection::Empty),
            (start, end) => DateSelection::from_bounds(start, end),
        }
    }
}

pub fn resolve_data_path(explicit: Option<&Path>, exe: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    exe.and_then(Path::parent)
        .map(|dir| dir.join(DEFAULT_DATA_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).ok_or_else(|| format!("'{value}' is not a YYYY-MM-DD date"))
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` is used, falling back to `info`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> NaiveDate {
        parse_iso_date(text).unwrap()
    }

    fn extent() -> Option<DateRange> {
        Some(DateRange::new(date("2011-01-01"), date("2012-12-31")).unwrap())
    }

    #[test]
    fn test_explicit_data_path_wins() {
        let path = resolve_data_path(
            Some(Path::new("/tmp/other.csv")),
            Some(Path::new("/opt/app/bin/dash")),
        );
        assert_eq!(path, PathBuf::from("/tmp/other.csv"));
    }

    #[test]
    fn test_default_data_path_is_next_to_executable() {
        let path = resolve_data_path(None, Some(Path::new("/opt/app/bin/dash")));
        assert_eq!(path, PathBuf::from("/opt/app/bin/df_cleaned.csv"));
        assert_eq!(resolve_data_path(None, None), PathBuf::from("df_cleaned.csv"));
    }

    #[test]
    fn test_parse_report_subcommand() {
        let cli = Cli::try_parse_from([
            "bikeshare_dashboard",
            "report",
            "--pretty",
            "--start",
            "2011-01-01",
            "--end",
            "2011-06-30",
            "--wind-scope",
            "filtered",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            Command::Report {
                output: None,
                pretty: true
            }
        );
        assert_eq!(cli.wind_scope, WindScope::Filtered);
        assert_eq!(
            cli.selection(extent()),
            DateSelection::Range(date("2011-01-01"), date("2011-06-30"))
        );
    }

    #[test]
    fn test_no_bounds_defaults_to_extent() {
        let cli = Cli::try_parse_from(["bikeshare_dashboard"]).unwrap();

        assert_eq!(cli.command(), Command::Gui);
        assert_eq!(cli.wind_scope, WindScope::Dataset);
        assert_eq!(
            cli.selection(extent()),
            DateSelection::Range(date("2011-01-01"), date("2012-12-31"))
        );
        assert_eq!(cli.selection(None), DateSelection::Empty);
    }

    #[test]
    fn test_one_bound_is_a_single_selection() {
        let cli = Cli::try_parse_from(["bikeshare_dashboard", "--start", "2011-03-01"]).unwrap();
        assert_eq!(cli.selection(extent()), DateSelection::Single(date("2011-03-01")));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["bikeshare_dashboard", "--end", "31/12/2012"]).is_err());
    }
}
