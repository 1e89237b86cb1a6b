//! JSON report of one dashboard run.

use crate::charts::ChartSpec;
use crate::stats::Dashboard;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Aggregations, metrics and chart data for a single date selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_from: PathBuf,
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub charts: Vec<ChartSpec>,
}

impl DashboardReport {
    pub fn new(source: &Path, dashboard: Dashboard) -> Self {
        let charts = ChartSpec::for_dashboard(&dashboard).into();
        Self {
            generated_from: source.to_path_buf(),
            dashboard,
            charts,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, ReportError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write to `path`, or to stdout when `path` is `None`.
    pub fn write(&self, path: Option<&Path>, pretty: bool) -> Result<(), ReportError> {
        let json = self.to_json(pretty)?;
        match path {
            Some(path) => {
                let mut out = BufWriter::new(File::create(path)?);
                writeln!(out, "{json}")?;
                out.flush()?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{json}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_iso_date, Dataset, DateSelection, Record};
    use crate::stats::WindScope;
    use serde_json::Value;

    fn dashboard() -> Dashboard {
        let ds = Dataset::from_records(&[Record {
            dteday: parse_iso_date("2011-01-01").unwrap(),
            yr: 0,
            mnth: 1,
            hr: 7,
            cnt: 10,
            casual: 3,
            registered: 7,
            windspeed: 0.1,
        }])
        .unwrap();
        let selection = DateSelection::from(ds.extent().unwrap());
        Dashboard::compute(&ds, selection, WindScope::Dataset).unwrap()
    }

    #[test]
    fn test_report_json_shape() {
        let report = DashboardReport::new(Path::new("df_cleaned.csv"), dashboard());
        let value: Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();

        assert_eq!(value["range"]["start"], "2011-01-01");
        assert_eq!(value["metrics"]["total"], 10);
        assert_eq!(value["daily"][0]["dteday"], "2011-01-01");
        assert_eq!(value["wind"][0]["category"], "Light");
        assert_eq!(value["wind_scope"], "dataset");
        assert_eq!(value["charts"].as_array().unwrap().len(), 4);
        assert_eq!(value["charts"][3]["kind"], "bar");
    }
}
