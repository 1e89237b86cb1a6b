//! Bike Sharing Dashboard
//!
//! Loads the cleaned hourly bike-sharing dataset, filters it to a date range and
//! derives the rental aggregations, summary metrics and charts shown by the dashboard.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
