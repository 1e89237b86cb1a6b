//! Data Processor Module
//! Builds derived tables from a `Dataset` without touching the source frame.

use crate::data::loader::{Dataset, WINDSPEED};
use crate::data::wind::WindCategory;
use polars::prelude::*;

/// Name of the derived wind category column.
pub const WIND_CLUSTER: &str = "wind_cluster";

/// Handles derived-column transformations.
pub struct DataProcessor;

impl DataProcessor {
    /// Copy of the dataset's frame with a `wind_cluster` label per row.
    ///
    /// Missing wind speeds classify like NaN, i.e. as `Strong`.
    pub fn with_wind_cluster(dataset: &Dataset) -> PolarsResult<DataFrame> {
        let labels: Vec<&str> = dataset
            .frame()
            .column(WINDSPEED)?
            .f64()?
            .into_iter()
            .map(|w| WindCategory::classify(w.unwrap_or(f64::NAN)).label())
            .collect();

        let mut derived = dataset.frame().clone();
        derived.with_column(Column::new(WIND_CLUSTER.into(), labels))?;
        Ok(derived)
    }
}
