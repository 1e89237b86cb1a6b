//! Dashboard Pipeline
//! One full run: resolve the date selection, filter, aggregate, total.

use crate::data::processor::DataProcessor;
use crate::data::range::{DateRange, DateSelection, RangeError};
use crate::data::Dataset;
use crate::stats::aggregator::{
    AggregationError, DailyRent, HourlyRent, MonthlyRent, RentAggregator, SummaryMetrics, WindRent,
};
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{0}")]
    Range(#[from] RangeError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
}

/// Which rows feed the wind-category chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindScope {
    /// Every loaded row, ignoring the date filter.
    #[default]
    Dataset,
    /// Only rows inside the selected date range.
    Filtered,
}

impl fmt::Display for WindScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindScope::Dataset => f.write_str("dataset"),
            WindScope::Filtered => f.write_str("filtered"),
        }
    }
}

impl FromStr for WindScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dataset" | "all" => Ok(WindScope::Dataset),
            "filtered" => Ok(WindScope::Filtered),
            other => Err(format!("unknown wind scope '{other}' (expected dataset|filtered)")),
        }
    }
}

/// Everything the presentation layer needs for one date selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub wind_scope: WindScope,
    pub rows: usize,
    pub metrics: SummaryMetrics,
    pub monthly: Vec<MonthlyRent>,
    pub daily: Vec<DailyRent>,
    pub hourly: Vec<HourlyRent>,
    pub wind: Vec<WindRent>,
}

impl Dashboard {
    /// Recompute the whole dashboard from the full dataset.
    ///
    /// An incomplete selection stops here, before any filtering or aggregation.
    pub fn compute(
        dataset: &Dataset,
        selection: DateSelection,
        wind_scope: WindScope,
    ) -> Result<Self, DashboardError> {
        let range = selection.resolve().inspect_err(|e| warn!("date filter: {e}"))?;

        let subset = dataset.filter_by_range(&range)?;
        debug!(%range, rows = subset.len(), of = dataset.len(), "filtered dataset");

        let wind_source = match wind_scope {
            WindScope::Dataset => dataset,
            WindScope::Filtered => &subset,
        };
        let clustered = DataProcessor::with_wind_cluster(wind_source)?;

        let dashboard = Self {
            range,
            wind_scope,
            rows: subset.len(),
            metrics: RentAggregator::summary(&subset)?,
            monthly: RentAggregator::monthly_rent(&subset)?,
            daily: RentAggregator::daily_rent(&subset)?,
            hourly: RentAggregator::hour_rent(&subset)?,
            wind: RentAggregator::wind_rent(&clustered)?,
        };
        debug!(
            monthly = dashboard.monthly.len(),
            daily = dashboard.daily.len(),
            hourly = dashboard.hourly.len(),
            wind = dashboard.wind.len(),
            "aggregations ready"
        );
        Ok(dashboard)
    }
}
