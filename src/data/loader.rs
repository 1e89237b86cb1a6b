//! CSV Data Loader Module
//! Loads the cleaned bike-sharing table with Polars and normalizes it into a typed `Dataset`.

use crate::data::range::{days_since_epoch, parse_iso_date, DateRange};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DTEDAY: &str = "dteday";
pub const YR: &str = "yr";
pub const MNTH: &str = "mnth";
pub const HR: &str = "hr";
pub const CNT: &str = "cnt";
pub const CASUAL: &str = "casual";
pub const REGISTERED: &str = "registered";
pub const WINDSPEED: &str = "windspeed";

/// Columns the dashboard needs, in the order they are kept.
pub const REQUIRED_COLUMNS: [&str; 8] = [DTEDAY, YR, MNTH, HR, CNT, CASUAL, REGISTERED, WINDSPEED];

const INTEGER_COLUMNS: [&str; 6] = [YR, MNTH, HR, CNT, CASUAL, REGISTERED];

/// File name of the cleaned dataset shipped next to the executable.
pub const DEFAULT_DATA_FILE: &str = "df_cleaned.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Row {row}: missing date")]
    MissingDate { row: usize },
    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
}

/// One row of bike-rental observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub dteday: NaiveDate,
    pub yr: i64,
    pub mnth: i64,
    pub hr: i64,
    pub cnt: i64,
    pub casual: i64,
    pub registered: i64,
    pub windspeed: f64,
}

/// Immutable, typed view of the rental table.
///
/// `dteday` is a `Date` column, the count columns are `Int64` and `windspeed`
/// is `Float64`. Cloning is cheap: Polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    extent: Option<DateRange>,
}

impl Dataset {
    /// Validate and normalize a raw frame (as read from CSV) into a `Dataset`.
    pub fn from_frame(raw: DataFrame) -> Result<Self, LoaderError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| raw.column(name).is_err())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }

        let raw_dates = raw.column(DTEDAY)?.cast(&DataType::String)?;
        let days = raw_dates
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let text = value.ok_or(LoaderError::MissingDate { row })?;
                parse_iso_date(text)
                    .map(days_since_epoch)
                    .ok_or_else(|| LoaderError::InvalidDate {
                        row,
                        value: text.to_string(),
                    })
            })
            .collect::<Result<Vec<i32>, LoaderError>>()?;

        let extent = match (days.iter().min(), days.iter().max()) {
            (Some(&lo), Some(&hi)) => DateRange::from_days(lo, hi),
            _ => None,
        };

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        columns.push(Column::new(DTEDAY.into(), days).cast(&DataType::Date)?);
        for name in INTEGER_COLUMNS {
            columns.push(raw.column(name)?.cast(&DataType::Int64)?);
        }
        columns.push(raw.column(WINDSPEED)?.cast(&DataType::Float64)?);

        Ok(Self {
            frame: DataFrame::new(columns)?,
            extent,
        })
    }

    /// Build a dataset from typed records, going through the same normalization as CSV input.
    pub fn from_records(records: &[Record]) -> Result<Self, LoaderError> {
        let dates: Vec<String> = records.iter().map(|r| r.dteday.to_string()).collect();

        let raw = DataFrame::new(vec![
            Column::new(DTEDAY.into(), dates),
            Column::new(YR.into(), int_column(records, |r| r.yr)),
            Column::new(MNTH.into(), int_column(records, |r| r.mnth)),
            Column::new(HR.into(), int_column(records, |r| r.hr)),
            Column::new(CNT.into(), int_column(records, |r| r.cnt)),
            Column::new(CASUAL.into(), int_column(records, |r| r.casual)),
            Column::new(REGISTERED.into(), int_column(records, |r| r.registered)),
            Column::new(
                WINDSPEED.into(),
                records.iter().map(|r| r.windspeed).collect::<Vec<f64>>(),
            ),
        ])?;

        Self::from_frame(raw)
    }

    /// Wrap a frame that is already typed (the output of a filter over a `Dataset`).
    pub(crate) fn from_typed(frame: DataFrame) -> PolarsResult<Self> {
        let days = frame.column(DTEDAY)?.cast(&DataType::Int32)?;
        let days = days.i32()?;
        let extent = match (days.min(), days.max()) {
            (Some(lo), Some(hi)) => DateRange::from_days(lo, hi),
            _ => None,
        };
        Ok(Self { frame, extent })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// [min(dteday), max(dteday)] over the loaded rows; `None` for an empty table.
    pub fn extent(&self) -> Option<DateRange> {
        self.extent
    }
}

fn int_column(records: &[Record], field: impl Fn(&Record) -> i64) -> Vec<i64> {
    records.iter().map(field).collect()
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load and normalize the CSV at `path`.
    pub fn load_csv(path: &Path) -> Result<Dataset, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "loading dataset");
        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        debug!(rows = raw.height(), columns = raw.width(), "csv parsed");

        let dataset = Dataset::from_frame(raw)?;
        info!(rows = dataset.len(), extent = ?dataset.extent(), "dataset ready");
        Ok(dataset)
    }
}
