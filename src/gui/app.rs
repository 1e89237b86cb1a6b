//! Bike Sharing Dashboard Application
//! Main window with the filter panel and the chart viewer.

use crate::charts::StaticChartRenderer;
use crate::data::{DateSelection, Dataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{Dashboard, DashboardError, WindScope};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 800;

/// Main application window.
pub struct DashboardApp {
    dataset: Dataset,
    source: PathBuf,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Dataset,
        source: PathBuf,
        initial: DateSelection,
        wind_scope: WindScope,
    ) -> Self {
        let control_panel = ControlPanel::new(dataset.extent(), initial, wind_scope);
        let mut app = Self {
            dataset,
            source,
            control_panel,
            chart_viewer: ChartViewer::new(),
        };
        app.refresh();
        app
    }

    /// Re-run the full pipeline for the current filter.
    fn refresh(&mut self) {
        let selection = match self.control_panel.selection() {
            Ok(selection) => selection,
            Err(message) => {
                self.chart_viewer.set_warning(message);
                self.control_panel.export_enabled = false;
                return;
            }
        };

        let wind_scope = self.control_panel.settings.wind_scope;
        match Dashboard::compute(&self.dataset, selection, wind_scope) {
            Ok(dashboard) => {
                self.control_panel.set_status(&format!(
                    "{} of {} rows selected",
                    dashboard.rows,
                    self.dataset.len()
                ));
                self.chart_viewer.set_dashboard(dashboard);
            }
            Err(DashboardError::Range(e)) => {
                self.chart_viewer.set_warning(e.to_string());
                self.control_panel.set_status("Waiting for a date range");
            }
            Err(e) => {
                error!("dashboard update failed: {e}");
                self.chart_viewer.set_warning(format!("Error: {e}"));
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
        self.control_panel.export_enabled = self.chart_viewer.has_charts();
    }

    /// Render the current charts to PNG files in a user-chosen folder.
    fn handle_export_charts(&mut self) {
        if !self.chart_viewer.has_charts() {
            self.control_panel.set_status("No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Export charts to folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::export_all(
            &self.chart_viewer.specs,
            &dir,
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        ) {
            Ok(paths) => {
                self.control_panel
                    .set_status(&format!("Exported {} charts", paths.len()));
                if let Err(e) = open::that(&dir) {
                    info!("could not open {}: {e}", dir.display());
                }
            }
            Err(e) => {
                error!("chart export failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Filter
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FilterChanged => self.refresh(),
                        ControlPanelAction::ResetRange => {
                            if let Some(extent) = self.control_panel.extent {
                                self.control_panel.set_selection(extent.into());
                                self.refresh();
                            }
                        }
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                egui::RichText::new(self.source.display().to_string())
                    .size(10.0)
                    .color(egui::Color32::GRAY),
            );
            self.chart_viewer.show(ui);
        });
    }
}

/// Open the dashboard window and block until it is closed.
pub fn run(
    dataset: Dataset,
    source: PathBuf,
    initial: DateSelection,
    wind_scope: WindScope,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Bike Sharing Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                cc, dataset, source, initial, wind_scope,
            )))
        }),
    )
}
