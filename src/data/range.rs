//! Date Range Module
//! Resolves the user's date selection and filters a `Dataset` to an inclusive range.

use crate::data::loader::{Dataset, DTEDAY};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// `NaiveDate::num_days_from_ce()` of 1970-01-01, the epoch of Polars' `Date` type.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("please select a two-date range")]
    Incomplete,
    #[error("start date {start} is after end date {end}")]
    Reversed { start: NaiveDate, end: NaiveDate },
}

/// What the user picked in the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Range(NaiveDate, NaiveDate),
    Single(NaiveDate),
    Empty,
}

impl DateSelection {
    /// Build a selection from two optional bounds.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => DateSelection::Range(start, end),
            (Some(date), None) | (None, Some(date)) => DateSelection::Single(date),
            (None, None) => DateSelection::Empty,
        }
    }

    /// Only a selection with two ordered bounds resolves.
    pub fn resolve(self) -> Result<DateRange, RangeError> {
        match self {
            DateSelection::Range(start, end) => DateRange::new(start, end),
            DateSelection::Single(_) | DateSelection::Empty => Err(RangeError::Incomplete),
        }
    }
}

impl From<DateRange> for DateSelection {
    fn from(range: DateRange) -> Self {
        DateSelection::Range(range.start, range.end)
    }
}

/// Inclusive `[start, end]` calendar range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub(crate) fn from_days(start: i32, end: i32) -> Option<Self> {
        Self::new(date_from_days(start)?, date_from_days(end)?).ok()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Polars predicate selecting rows whose `dteday` lies inside the range.
    pub fn predicate(&self) -> Expr {
        col(DTEDAY)
            .gt_eq(date_literal(self.start))
            .and(col(DTEDAY).lt_eq(date_literal(self.end)))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

impl Dataset {
    /// Rows with `start <= dteday <= end`. An empty result is not an error.
    pub fn filter_by_range(&self, range: &DateRange) -> PolarsResult<Dataset> {
        let frame = self
            .frame()
            .clone()
            .lazy()
            .filter(range.predicate())
            .collect()?;
        Dataset::from_typed(frame)
    }
}

/// Parse ISO-8601 calendar text. Timestamps in `YYYY-MM-DD HH:MM:SS` form keep their date.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .ok()
}

pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

fn date_literal(date: NaiveDate) -> Expr {
    lit(days_since_epoch(date)).cast(DataType::Date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Record;

    fn date(text: &str) -> NaiveDate {
        parse_iso_date(text).unwrap()
    }

    fn record(day: &str) -> Record {
        Record {
            dteday: date(day),
            yr: 0,
            mnth: 1,
            hr: 0,
            cnt: 1,
            casual: 0,
            registered: 1,
            windspeed: 0.2,
        }
    }

    fn dataset(days: &[&str]) -> Dataset {
        let records: Vec<Record> = days.iter().map(|d| record(d)).collect();
        Dataset::from_records(&records).unwrap()
    }

    fn dates_of(ds: &Dataset) -> Vec<NaiveDate> {
        let days = ds.frame().column(DTEDAY).unwrap().cast(&DataType::Int32).unwrap();
        days.i32()
            .unwrap()
            .into_iter()
            .map(|d| date_from_days(d.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_epoch_round_trip() {
        assert_eq!(days_since_epoch(date("1970-01-01")), 0);
        assert_eq!(days_since_epoch(date("2011-01-01")), 14975);
        assert_eq!(date_from_days(14975), Some(date("2011-01-01")));
    }

    #[test]
    fn test_parse_iso_date_forms() {
        assert_eq!(parse_iso_date("2012-02-29"), Some(date("2012-02-29")));
        assert_eq!(parse_iso_date("2012-02-29 00:00:00"), Some(date("2012-02-29")));
        assert_eq!(parse_iso_date(" 2012-02-29 "), Some(date("2012-02-29")));
        assert_eq!(parse_iso_date("2011-2-3"), Some(date("2011-02-03")));
        assert_eq!(parse_iso_date("02/03/2011"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_single_date_does_not_resolve() {
        let sel = DateSelection::from_bounds(Some(date("2011-01-01")), None);
        assert_eq!(sel, DateSelection::Single(date("2011-01-01")));
        assert_eq!(sel.resolve(), Err(RangeError::Incomplete));
        assert_eq!(
            DateSelection::from_bounds(None, Some(date("2011-01-01"))).resolve(),
            Err(RangeError::Incomplete)
        );
        assert_eq!(DateSelection::Empty.resolve(), Err(RangeError::Incomplete));
        assert_eq!(
            RangeError::Incomplete.to_string(),
            "please select a two-date range"
        );
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = DateSelection::Range(date("2011-02-01"), date("2011-01-01"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, RangeError::Reversed { .. }));
    }

    #[test]
    fn test_filter_is_inclusive_on_both_ends() {
        let ds = dataset(&["2011-01-01", "2011-01-02", "2011-01-03", "2011-01-04"]);
        let range = DateRange::new(date("2011-01-02"), date("2011-01-03")).unwrap();
        let subset = ds.filter_by_range(&range).unwrap();

        assert_eq!(dates_of(&subset), vec![date("2011-01-02"), date("2011-01-03")]);
        assert_eq!(subset.extent(), Some(range));
    }

    #[test]
    fn test_filter_uses_calendar_order() {
        // Text order would put "2011-1-10" before "2011-1-9".
        let mut raw = dataset(&["2011-01-01", "2011-01-01", "2011-01-01"]).frame().clone();
        raw.with_column(Column::new(
            DTEDAY.into(),
            vec!["2011-1-9", "2011-1-10", "2011-10-1"],
        ))
        .unwrap();
        let ds = Dataset::from_frame(raw).unwrap();
        let range = DateRange::new(date("2011-01-09"), date("2011-01-10")).unwrap();

        assert_eq!(ds.filter_by_range(&range).unwrap().len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset(&["2011-01-01", "2011-01-05", "2011-02-01", "2011-03-01"]);
        let range = DateRange::new(date("2011-01-03"), date("2011-02-01")).unwrap();
        let once = ds.filter_by_range(&range).unwrap();
        let twice = once.filter_by_range(&range).unwrap();

        assert!(once.frame().equals(twice.frame()));
        assert!(dates_of(&once).iter().all(|d| range.contains(*d)));
    }

    #[test]
    fn test_filter_with_no_matches_is_empty() {
        let ds = dataset(&["2011-01-01", "2011-01-02"]);
        let range = DateRange::new(date("2013-01-01"), date("2013-12-31")).unwrap();
        let subset = ds.filter_by_range(&range).unwrap();

        assert!(subset.is_empty());
        assert!(subset.extent().is_none());
    }
}
