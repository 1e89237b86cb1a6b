//! Chart Viewer Widget
//! Central scrollable panel: the three metrics followed by the four chart cards.

use crate::charts::{ChartPlotter, ChartSpec};
use crate::stats::Dashboard;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 300.0;

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    pub dashboard: Option<Dashboard>,
    pub specs: Vec<ChartSpec>,
    /// Shown instead of any chart when set.
    pub warning: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        self.specs = ChartSpec::for_dashboard(&dashboard).into();
        self.dashboard = Some(dashboard);
        self.warning = None;
    }

    /// Drop all charts and show `message` instead.
    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.dashboard = None;
        self.specs.clear();
        self.warning = Some(message.into());
    }

    pub fn has_charts(&self) -> bool {
        !self.specs.is_empty()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.heading("Bike Sharing Dashboard 📊");
        ui.add_space(8.0);

        if let Some(warning) = &self.warning {
            egui::Frame::none()
                .fill(Color32::from_rgb(255, 243, 205))
                .rounding(5.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("⚠ {warning}"))
                            .size(14.0)
                            .color(Color32::from_rgb(133, 100, 4)),
                    );
                });
            return;
        }

        let Some(dashboard) = &self.dashboard else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} rows between {} and {}",
                        dashboard.rows,
                        dashboard.range.start(),
                        dashboard.range.end()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(5.0);
                ChartPlotter::draw_metrics(ui, &dashboard.metrics);
                ui.add_space(CARD_SPACING);

                for spec in &self.specs {
                    Self::draw_chart_card(ui, spec);
                    ui.add_space(CARD_SPACING);
                }

                ui.label(RichText::new("Bike Sharing Dashboard").size(10.0).color(Color32::GRAY));
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, spec: &ChartSpec) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(120, 120, 120)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&spec.question).size(16.0).strong());
                    ui.label(RichText::new(&spec.title).size(12.0).color(Color32::GRAY));
                    ui.add_space(6.0);
                    if spec.is_empty() {
                        ui.label(RichText::new("No rentals in the selected range").italics());
                    }
                    ChartPlotter::draw_chart(ui, spec, CHART_HEIGHT);
                });
            });
    }
}
