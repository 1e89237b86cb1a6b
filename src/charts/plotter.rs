//! Chart Plotter Module
//! Draws `ChartSpec`s interactively with egui_plot.

use crate::charts::spec::{ChartKind, ChartSpec, Rgb};
use crate::stats::SummaryMetrics;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.0, c.1, c.2)
    }
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one chart at the given height.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let x_axis = spec.x_axis;
        let categories = spec.categories();

        let plot = Plot::new(format!("chart_{}", spec.slug()))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| x_axis.format(mark.value, &categories));

        match spec.kind {
            ChartKind::Line => {
                plot.show(ui, |plot_ui| {
                    for series in &spec.series {
                        let color = Color32::from(series.color);
                        let points: Vec<[f64; 2]> =
                            series.points.iter().map(|p| [p.x, p.y]).collect();

                        plot_ui.line(
                            Line::new(PlotPoints::from_iter(points.iter().copied()))
                                .color(color)
                                .width(2.0)
                                .name(&series.name),
                        );
                        if spec.markers {
                            plot_ui.points(
                                Points::new(PlotPoints::from_iter(points.iter().copied()))
                                    .radius(3.0)
                                    .color(color)
                                    .name(&series.name),
                            );
                        }
                    }
                });
            }
            ChartKind::Bar => {
                plot.show(ui, |plot_ui| {
                    for series in &spec.series {
                        let color = Color32::from(series.color);
                        let bars = series
                            .points
                            .iter()
                            .map(|p| Bar::new(p.x, p.y).width(0.6).fill(color).name(&p.label))
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.name));
                    }
                });
            }
        }
    }

    /// Draw the three headline metrics side by side.
    pub fn draw_metrics(ui: &mut egui::Ui, metrics: &SummaryMetrics) {
        ui.columns(3, |cols| {
            Self::metric(&mut cols[0], "Total All Users", metrics.total);
            Self::metric(&mut cols[1], "Total Casual Users", metrics.casual);
            Self::metric(&mut cols[2], "Total Registered Users", metrics.registered);
        });
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: i64) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(format_count(value)).size(24.0).strong());
            });
    }
}

/// Thousands-separated integer, e.g. `3292679` -> `3,292,679`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
