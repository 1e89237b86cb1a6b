//! Data module - CSV loading, date filtering and derived columns

pub mod loader;
pub mod processor;
pub mod range;
pub mod wind;

pub use loader::{DataLoader, Dataset, LoaderError, Record};
pub use processor::DataProcessor;
pub use range::{parse_iso_date, DateRange, DateSelection, RangeError};
pub use wind::WindCategory;
