//! Statistics module - rental aggregations and the dashboard pipeline

pub mod aggregator;
pub mod pipeline;

pub use aggregator::{
    AggregationError, DailyRent, HourlyRent, MonthlyRent, RentAggregator, SummaryMetrics, WindRent,
};
pub use pipeline::{Dashboard, DashboardError, WindScope};
