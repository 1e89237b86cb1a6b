//! Charts module - Chart specifications and rendering

pub mod plotter;
pub mod renderer;
pub mod spec;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{ChartId, ChartKind, ChartSpec, DataPoint, Rgb, SeriesSpec, XAxis};
