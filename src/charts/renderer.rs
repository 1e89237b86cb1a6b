//! Static Chart Renderer
//! Renders `ChartSpec`s to PNG with plotters, for export outside the GUI.
//!
//! Charts are drawn into an in-memory RGB buffer and encoded with `image`,
//! so a render either produces a complete file or nothing.

use crate::charts::spec::{ChartKind, ChartSpec, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const TITLE_FONT: (&str, u32) = ("sans-serif", 28);
const LABEL_FONT: (&str, u32) = ("sans-serif", 16);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Invalid image size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart into a `width * height * 3` RGB buffer.
    pub fn render_rgb(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize(width, height));
        }

        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let drawn = match spec.kind {
                ChartKind::Line => Self::draw_line_chart(&root, spec),
                ChartKind::Bar => Self::draw_bar_chart(&root, spec),
            };
            drawn
                .and_then(|_| root.present())
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        Ok(buffer)
    }

    /// Render one chart to a PNG file.
    pub fn render_png(
        spec: &ChartSpec,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let buffer = Self::render_rgb(spec, width, height)?;
        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::InvalidSize(width, height))?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Render every chart into `out_dir` as `<slug>.png`, in parallel.
    pub fn export_all(
        specs: &[ChartSpec],
        out_dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(out_dir)?;

        let paths = specs
            .par_iter()
            .map(|spec| {
                let path = out_dir.join(format!("{}.png", spec.slug()));
                Self::render_png(spec, &path, width, height)?;
                Ok(path)
            })
            .collect::<Result<Vec<PathBuf>, RenderError>>()?;

        info!(count = paths.len(), dir = %out_dir.display(), "charts exported");
        Ok(paths)
    }

    fn y_range(spec: &ChartSpec) -> std::ops::Range<f64> {
        let top = spec.y_bounds().map(|(_, hi)| hi.max(0.0)).unwrap_or(0.0);
        let top = if top > 0.0 { top * 1.1 } else { 1.0 };
        0.0..top
    }

    fn draw_line_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let (x_min, x_max) = spec.x_bounds().unwrap_or((0.0, 1.0));
        // A single x value still needs a non-empty axis.
        let (x_min, x_max) = if x_max > x_min {
            (x_min, x_max)
        } else {
            (x_min - 1.0, x_max + 1.0)
        };
        let x_axis = spec.x_axis;
        let categories = spec.categories();

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, Self::y_range(spec))?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_label_formatter(&|x| x_axis.format(*x, &categories))
            .label_style(LABEL_FONT)
            .draw()?;

        for series in &spec.series {
            let color = RGBColor::from(series.color);
            let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.x, p.y)).collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

            if spec.markers {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                )?;
            }
        }

        if !spec.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(LABEL_FONT)
                .draw()?;
        }

        Ok(())
    }

    fn draw_bar_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let categories = spec.categories();
        let n = categories.len().max(1) as f64;
        let x_axis = spec.x_axis;

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..(n - 0.5), Self::y_range(spec))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len().max(1))
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_label_formatter(&|x| x_axis.format(*x, &categories))
            .label_style(LABEL_FONT)
            .draw()?;

        for series in &spec.series {
            let color = RGBColor::from(series.color);
            chart.draw_series(series.points.iter().map(|p| {
                Rectangle::new([(p.x - 0.3, 0.0), (p.x + 0.3, p.y)], color.filled())
            }))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WindCategory;
    use crate::stats::WindRent;

    #[test]
    fn test_zero_size_is_rejected() {
        let spec = ChartSpec::wind(&[]);
        let err = StaticChartRenderer::render_rgb(&spec, 0, 100).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize(0, 100)));
    }

    #[test]
    fn test_y_range_pads_the_maximum() {
        let spec = ChartSpec::wind(&[WindRent {
            category: WindCategory::Light,
            cnt: 100,
        }]);
        let range = StaticChartRenderer::y_range(&spec);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 110.0).abs() < 1e-9);

        assert_eq!(StaticChartRenderer::y_range(&ChartSpec::wind(&[])).end, 1.0);
    }
}
