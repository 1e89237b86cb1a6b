//! Chart Specifications
//! Presentation-neutral description of the four dashboard charts.
//!
//! Both the interactive viewer (egui_plot) and the static renderer (plotters)
//! draw from these, so the data behind each chart is defined exactly once.

use crate::data::range::{date_from_days, days_since_epoch};
use crate::data::WindCategory;
use crate::stats::{DailyRent, Dashboard, HourlyRent, MonthlyRent, WindRent};
use serde::Serialize;
use std::collections::BTreeMap;

/// Plain RGB color, converted to the backend's color type at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Series palette for charts with more than one line.
pub const PALETTE: [Rgb; 6] = [
    Rgb(52, 152, 219),  // Blue
    Rgb(231, 76, 60),   // Red
    Rgb(46, 204, 113),  // Green
    Rgb(155, 89, 182),  // Purple
    Rgb(243, 156, 18),  // Orange
    Rgb(26, 188, 156),  // Teal
];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl WindCategory {
    /// Fixed bar color per category.
    pub fn color(self) -> Rgb {
        match self {
            WindCategory::Light => Rgb(0, 128, 0),
            WindCategory::Moderate => Rgb(0, 0, 255),
            WindCategory::Strong => Rgb(255, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    MonthlyRent,
    DailyRent,
    HourlyRent,
    WindRent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

/// How x values are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxis {
    /// Month number 1-12.
    Month,
    /// Days since 1970-01-01.
    Date,
    /// Hour of day 0-23.
    Hour,
    /// Index into the point labels.
    Category,
}

impl XAxis {
    /// Tick label for an x value.
    pub fn format(self, x: f64, categories: &[String]) -> String {
        match self {
            XAxis::Month => {
                let month = x.round() as i64;
                if (1..=12).contains(&month) && (x - month as f64).abs() < 1e-6 {
                    MONTH_NAMES[(month - 1) as usize].to_string()
                } else {
                    String::new()
                }
            }
            XAxis::Date => date_from_days(x.round() as i32)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            XAxis::Hour => format!("{:.0}", x),
            XAxis::Category => {
                let idx = x.round();
                if idx >= 0.0 && (x - idx).abs() < 1e-6 {
                    categories.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    /// Question the chart answers, shown as the card heading.
    pub question: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub markers: bool,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// One line per distinct year value, x = month.
    pub fn monthly(rows: &[MonthlyRent]) -> Self {
        let mut by_year: BTreeMap<i64, Vec<DataPoint>> = BTreeMap::new();
        for row in rows {
            by_year.entry(row.yr).or_default().push(DataPoint {
                x: row.mnth as f64,
                y: row.cnt as f64,
                label: format!("{}-{:02}", row.yr, row.mnth),
            });
        }

        let series = by_year
            .into_iter()
            .enumerate()
            .map(|(i, (yr, points))| SeriesSpec {
                name: yr.to_string(),
                color: PALETTE[i % PALETTE.len()],
                points,
            })
            .collect();

        Self {
            id: ChartId::MonthlyRent,
            kind: ChartKind::Line,
            title: "Bike Rentals by Month".to_string(),
            question: "How does bike usage change month to month across the years?".to_string(),
            x_label: "Month".to_string(),
            y_label: "Rentals".to_string(),
            x_axis: XAxis::Month,
            markers: true,
            series,
        }
    }

    /// Casual vs registered rentals per day.
    pub fn daily(rows: &[DailyRent]) -> Self {
        let line = |name: &str, color: Rgb, value: fn(&DailyRent) -> i64| SeriesSpec {
            name: name.to_string(),
            color,
            points: rows
                .iter()
                .map(|row| DataPoint {
                    x: days_since_epoch(row.dteday) as f64,
                    y: value(row) as f64,
                    label: row.dteday.to_string(),
                })
                .collect(),
        };

        Self {
            id: ChartId::DailyRent,
            kind: ChartKind::Line,
            title: "Daily Rentals: Casual vs Registered".to_string(),
            question: "How do casual and registered riders compare day by day?".to_string(),
            x_label: "Day".to_string(),
            y_label: "Rentals".to_string(),
            x_axis: XAxis::Date,
            markers: false,
            series: vec![
                line("casual", PALETTE[0], |r| r.casual),
                line("registered", PALETTE[1], |r| r.registered),
            ],
        }
    }

    /// Mean rentals per hour of day.
    pub fn hourly(rows: &[HourlyRent]) -> Self {
        let points = rows
            .iter()
            .map(|row| DataPoint {
                x: row.hr as f64,
                y: row.cnt,
                label: format!("{:02}:00", row.hr),
            })
            .collect();

        Self {
            id: ChartId::HourlyRent,
            kind: ChartKind::Line,
            title: "Bike Rentals by Hour".to_string(),
            question: "How does bike usage vary over the hours of the day?".to_string(),
            x_label: "Hour".to_string(),
            y_label: "Average Rentals".to_string(),
            x_axis: XAxis::Hour,
            markers: true,
            series: vec![SeriesSpec {
                name: "cnt".to_string(),
                color: PALETTE[0],
                points,
            }],
        }
    }

    /// One colored bar per wind category present.
    pub fn wind(rows: &[WindRent]) -> Self {
        let series = rows
            .iter()
            .enumerate()
            .map(|(i, row)| SeriesSpec {
                name: row.category.label().to_string(),
                color: row.category.color(),
                points: vec![DataPoint {
                    x: i as f64,
                    y: row.cnt as f64,
                    label: row.category.label().to_string(),
                }],
            })
            .collect();

        Self {
            id: ChartId::WindRent,
            kind: ChartKind::Bar,
            title: "Bike Rentals by Wind Speed".to_string(),
            question: "Wind speed clustering: how do rentals split across wind categories?"
                .to_string(),
            x_label: "Wind Category".to_string(),
            y_label: "Rentals".to_string(),
            x_axis: XAxis::Category,
            markers: false,
            series,
        }
    }

    /// All four charts in display order.
    pub fn for_dashboard(dashboard: &Dashboard) -> [ChartSpec; 4] {
        [
            Self::monthly(&dashboard.monthly),
            Self::daily(&dashboard.daily),
            Self::hourly(&dashboard.hourly),
            Self::wind(&dashboard.wind),
        ]
    }

    /// Category labels, in x order, for `XAxis::Category` charts.
    pub fn categories(&self) -> Vec<String> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.label.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// (min, max) over all x values, if any.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.x)))
    }

    /// (min, max) over all finite y values, if any.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.y)))
    }

    /// File-system friendly name.
    pub fn slug(&self) -> &'static str {
        match self.id {
            ChartId::MonthlyRent => "monthly_rent",
            ChartId::DailyRent => "daily_rent",
            ChartId::HourlyRent => "hourly_rent",
            ChartId::WindRent => "wind_rent",
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_iso_date;

    #[test]
    fn test_monthly_has_one_series_per_year() {
        let rows = vec![
            MonthlyRent { yr: 0, mnth: 1, cnt: 10 },
            MonthlyRent { yr: 0, mnth: 2, cnt: 20 },
            MonthlyRent { yr: 1, mnth: 1, cnt: 30 },
        ];
        let spec = ChartSpec::monthly(&rows);

        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "0");
        assert_eq!(spec.series[0].points.len(), 2);
        assert_eq!(spec.series[1].points[0].y, 30.0);
    }

    #[test]
    fn test_daily_has_casual_and_registered() {
        let rows = vec![DailyRent {
            dteday: parse_iso_date("2011-01-01").unwrap(),
            casual: 3,
            registered: 7,
        }];
        let spec = ChartSpec::daily(&rows);
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["casual", "registered"]);
        assert_eq!(spec.series[1].points[0].y, 7.0);
        assert_eq!(spec.x_axis.format(spec.series[0].points[0].x, &[]), "2011-01-01");
    }

    #[test]
    fn test_wind_bars_use_fixed_colors() {
        let rows = vec![
            WindRent { category: WindCategory::Light, cnt: 5 },
            WindRent { category: WindCategory::Strong, cnt: 1 },
        ];
        let spec = ChartSpec::wind(&rows);

        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.series[0].color, Rgb(0, 128, 0));
        assert_eq!(spec.series[1].color, Rgb(255, 0, 0));
        assert_eq!(spec.categories(), vec!["Light", "Strong"]);
        assert_eq!(spec.x_axis.format(1.0, &spec.categories()), "Strong");
    }

    #[test]
    fn test_empty_rows_give_empty_charts() {
        assert!(ChartSpec::monthly(&[]).is_empty());
        assert!(ChartSpec::daily(&[]).is_empty());
        assert!(ChartSpec::hourly(&[]).is_empty());
        assert!(ChartSpec::wind(&[]).is_empty());
        assert_eq!(ChartSpec::hourly(&[]).y_bounds(), None);
    }

    #[test]
    fn test_month_ticks() {
        assert_eq!(XAxis::Month.format(1.0, &[]), "Jan");
        assert_eq!(XAxis::Month.format(12.0, &[]), "Dec");
        assert_eq!(XAxis::Month.format(1.5, &[]), "");
        assert_eq!(XAxis::Month.format(13.0, &[]), "");
    }
}
