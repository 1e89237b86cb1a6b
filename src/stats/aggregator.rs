//! Rental Aggregation Module
//! Grouped aggregations and summary totals over a (filtered) `Dataset`.

use crate::data::loader::{Dataset, CASUAL, CNT, DTEDAY, HR, MNTH, REGISTERED, YR};
use crate::data::processor::WIND_CLUSTER;
use crate::data::range::date_from_days;
use crate::data::wind::WindCategory;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Date out of range: {0} days since epoch")]
    InvalidDate(i32),
    #[error("{0}")]
    UnknownWindCategory(String),
}

/// Total rentals for one (year, month) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRent {
    pub yr: i64,
    pub mnth: i64,
    pub cnt: i64,
}

/// Casual and registered rentals for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRent {
    pub dteday: NaiveDate,
    pub casual: i64,
    pub registered: i64,
}

/// Mean rentals at one hour of the day, across every day in the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRent {
    pub hr: i64,
    pub cnt: f64,
}

/// Total rentals for one wind category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindRent {
    pub category: WindCategory,
    pub cnt: i64,
}

/// The three headline totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub total: i64,
    pub casual: i64,
    pub registered: i64,
}

/// Groupby aggregations behind the four dashboard charts.
///
/// Groups with no rows are absent from the output rather than zero-filled.
pub struct RentAggregator;

impl RentAggregator {
    /// Sum of `cnt` per (yr, mnth), ordered by year then month.
    pub fn monthly_rent(dataset: &Dataset) -> Result<Vec<MonthlyRent>, AggregationError> {
        let out = dataset
            .frame()
            .clone()
            .lazy()
            .group_by([col(YR), col(MNTH)])
            .agg([col(CNT).sum()])
            .sort([YR, MNTH], SortMultipleOptions::default())
            .collect()?;

        let yrs = out.column(YR)?.i64()?;
        let mnths = out.column(MNTH)?.i64()?;
        let cnts = out.column(CNT)?.i64()?;

        Ok(yrs
            .into_iter()
            .zip(mnths)
            .zip(cnts)
            .filter_map(|((yr, mnth), cnt)| {
                Some(MonthlyRent {
                    yr: yr?,
                    mnth: mnth?,
                    cnt: cnt.unwrap_or(0),
                })
            })
            .collect())
    }

    /// Sums of `casual` and `registered` per date, in date order.
    pub fn daily_rent(dataset: &Dataset) -> Result<Vec<DailyRent>, AggregationError> {
        let out = dataset
            .frame()
            .clone()
            .lazy()
            .group_by([col(DTEDAY)])
            .agg([col(CASUAL).sum(), col(REGISTERED).sum()])
            .sort([DTEDAY], SortMultipleOptions::default())
            .collect()?;

        let days = out.column(DTEDAY)?.cast(&DataType::Int32)?;
        let days = days.i32()?;
        let casual = out.column(CASUAL)?.i64()?;
        let registered = out.column(REGISTERED)?.i64()?;

        let mut rows = Vec::with_capacity(out.height());
        for ((day, casual), registered) in days.into_iter().zip(casual).zip(registered) {
            let Some(day) = day else {
                continue;
            };
            let dteday = date_from_days(day).ok_or(AggregationError::InvalidDate(day))?;
            rows.push(DailyRent {
                dteday,
                casual: casual.unwrap_or(0),
                registered: registered.unwrap_or(0),
            });
        }
        Ok(rows)
    }

    /// Mean `cnt` per hour of day over all rows in the dataset.
    pub fn hour_rent(dataset: &Dataset) -> Result<Vec<HourlyRent>, AggregationError> {
        let out = dataset
            .frame()
            .clone()
            .lazy()
            .group_by([col(HR)])
            .agg([col(CNT).mean()])
            .sort([HR], SortMultipleOptions::default())
            .collect()?;

        let hours = out.column(HR)?.i64()?;
        let means = out.column(CNT)?.f64()?;

        Ok(hours
            .into_iter()
            .zip(means)
            .filter_map(|(hr, cnt)| {
                Some(HourlyRent {
                    hr: hr?,
                    cnt: cnt.unwrap_or(f64::NAN),
                })
            })
            .collect())
    }

    /// Sum of `cnt` per wind category of a frame carrying `wind_cluster`.
    ///
    /// Rows come back in category order (Light, Moderate, Strong).
    pub fn wind_rent(clustered: &DataFrame) -> Result<Vec<WindRent>, AggregationError> {
        let out = clustered
            .clone()
            .lazy()
            .group_by([col(WIND_CLUSTER)])
            .agg([col(CNT).sum()])
            .collect()?;

        let labels = out.column(WIND_CLUSTER)?.str()?;
        let cnts = out.column(CNT)?.i64()?;

        let mut rows = Vec::with_capacity(out.height());
        for (label, cnt) in labels.into_iter().zip(cnts) {
            let Some(label) = label else {
                continue;
            };
            let category = label
                .parse::<WindCategory>()
                .map_err(AggregationError::UnknownWindCategory)?;
            rows.push(WindRent {
                category,
                cnt: cnt.unwrap_or(0),
            });
        }
        rows.sort_by_key(|row| row.category);
        Ok(rows)
    }

    /// Totals of `cnt`, `casual` and `registered`; zero for an empty dataset.
    pub fn summary(dataset: &Dataset) -> Result<SummaryMetrics, AggregationError> {
        let frame = dataset.frame();
        let total = |name: &str| -> Result<i64, AggregationError> {
            Ok(frame.column(name)?.i64()?.sum().unwrap_or(0))
        };

        Ok(SummaryMetrics {
            total: total(CNT)?,
            casual: total(CASUAL)?,
            registered: total(REGISTERED)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Record;
    use crate::data::processor::DataProcessor;
    use crate::data::range::parse_iso_date;

    fn rec(day: &str, yr: i64, mnth: i64, hr: i64, casual: i64, registered: i64, wind: f64) -> Record {
        Record {
            dteday: parse_iso_date(day).unwrap(),
            yr,
            mnth,
            hr,
            cnt: casual + registered,
            casual,
            registered,
            windspeed: wind,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(&[
            rec("2011-01-01", 0, 1, 0, 3, 13, 0.1),
            rec("2011-01-01", 0, 1, 1, 8, 32, 0.35),
            rec("2011-02-01", 0, 2, 0, 1, 4, 0.65),
            rec("2012-01-01", 1, 1, 1, 10, 50, 0.2),
            rec("2012-01-02", 1, 1, 0, 2, 2, 0.6),
            rec("2011-12-31", 0, 12, 23, 0, 7, 0.3),
        ])
        .unwrap()
    }

    #[test]
    fn test_monthly_rent_is_sorted_and_summed() {
        let rows = RentAggregator::monthly_rent(&sample()).unwrap();
        let keys: Vec<(i64, i64, i64)> = rows.iter().map(|r| (r.yr, r.mnth, r.cnt)).collect();

        assert_eq!(keys, vec![(0, 1, 56), (0, 2, 5), (0, 12, 7), (1, 1, 64)]);
    }

    #[test]
    fn test_monthly_sums_match_yearly_totals() {
        let ds = sample();
        let rows = RentAggregator::monthly_rent(&ds).unwrap();
        let year0: i64 = rows.iter().filter(|r| r.yr == 0).map(|r| r.cnt).sum();
        let year1: i64 = rows.iter().filter(|r| r.yr == 1).map(|r| r.cnt).sum();

        assert_eq!(year0, 16 + 40 + 5 + 7);
        assert_eq!(year1, 60 + 4);
    }

    #[test]
    fn test_daily_rent_splits_rider_types() {
        let rows = RentAggregator::daily_rent(&sample()).unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].dteday, parse_iso_date("2011-01-01").unwrap());
        assert_eq!((rows[0].casual, rows[0].registered), (11, 45));
        assert_eq!(rows[2].dteday, parse_iso_date("2011-12-31").unwrap());
        assert_eq!(rows[4].dteday, parse_iso_date("2012-01-02").unwrap());
    }

    #[test]
    fn test_hour_rent_is_a_mean() {
        let rows = RentAggregator::hour_rent(&sample()).unwrap();
        let hours: Vec<i64> = rows.iter().map(|r| r.hr).collect();
        assert_eq!(hours, vec![0, 1, 23]);

        // hour 0: 16, 5, 4
        assert!((rows[0].cnt - 25.0 / 3.0).abs() < 1e-9);
        assert!(rows[0].cnt >= 4.0 && rows[0].cnt <= 16.0);
        // hour 1: 40, 60
        assert!((rows[1].cnt - 50.0).abs() < 1e-9);
        assert!((rows[2].cnt - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_rent_uses_exact_boundaries() {
        let clustered = DataProcessor::with_wind_cluster(&sample()).unwrap();
        let rows = RentAggregator::wind_rent(&clustered).unwrap();
        let pairs: Vec<(WindCategory, i64)> = rows.iter().map(|r| (r.category, r.cnt)).collect();

        assert_eq!(
            pairs,
            vec![
                (WindCategory::Light, 16 + 60),
                (WindCategory::Moderate, 40 + 7),
                (WindCategory::Strong, 5 + 4),
            ]
        );
    }

    #[test]
    fn test_wind_rent_omits_absent_categories() {
        let ds = Dataset::from_records(&[rec("2011-01-01", 0, 1, 0, 1, 1, 0.9)]).unwrap();
        let clustered = DataProcessor::with_wind_cluster(&ds).unwrap();
        let rows = RentAggregator::wind_rent(&clustered).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, WindCategory::Strong);
    }

    #[test]
    fn test_summary_totals() {
        let metrics = RentAggregator::summary(&sample()).unwrap();

        assert_eq!(metrics.casual, 24);
        assert_eq!(metrics.registered, 108);
        assert_eq!(metrics.total, metrics.casual + metrics.registered);
    }

    #[test]
    fn test_empty_dataset_aggregates_to_nothing() {
        let ds = Dataset::from_records(&[]).unwrap();
        let clustered = DataProcessor::with_wind_cluster(&ds).unwrap();

        assert!(RentAggregator::monthly_rent(&ds).unwrap().is_empty());
        assert!(RentAggregator::daily_rent(&ds).unwrap().is_empty());
        assert!(RentAggregator::hour_rent(&ds).unwrap().is_empty());
        assert!(RentAggregator::wind_rent(&clustered).unwrap().is_empty());
        assert_eq!(RentAggregator::summary(&ds).unwrap(), SummaryMetrics::default());
    }
}
