//! Control Panel Widget
//! Left side panel with the date filter and export controls.

use crate::data::range::{parse_iso_date, DateRange, DateSelection};
use crate::stats::WindScope;
use chrono::NaiveDate;
use egui::{Color32, RichText};

/// Filter inputs as typed by the user.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterSettings {
    pub start_text: String,
    pub end_text: String,
    pub wind_scope: WindScope,
}

/// Left side control panel with the date filter.
pub struct ControlPanel {
    pub settings: FilterSettings,
    pub extent: Option<DateRange>,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(extent: Option<DateRange>, initial: DateSelection, wind_scope: WindScope) -> Self {
        let mut panel = Self {
            settings: FilterSettings {
                wind_scope,
                ..Default::default()
            },
            extent,
            status: "Ready".to_string(),
            export_enabled: false,
        };
        panel.set_selection(initial);
        panel
    }

    /// Fill the date fields from a selection.
    pub fn set_selection(&mut self, selection: DateSelection) {
        let (start, end) = match selection {
            DateSelection::Range(start, end) => (Some(start), Some(end)),
            DateSelection::Single(date) => (Some(date), None),
            DateSelection::Empty => (None, None),
        };
        self.settings.start_text = start.map(|d| d.to_string()).unwrap_or_default();
        self.settings.end_text = end.map(|d| d.to_string()).unwrap_or_default();
    }

    /// Current selection; blank fields count as missing bounds.
    pub fn selection(&self) -> Result<DateSelection, String> {
        let start = parse_field("Start", &self.settings.start_text)?;
        let end = parse_field("End", &self.settings.end_text)?;
        Ok(DateSelection::from_bounds(start, end))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Sharing")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Filter Section =====
        ui.label(RichText::new("📅 Date Filter").size(14.0).strong());
        ui.add_space(5.0);

        if let Some(extent) = self.extent {
            ui.label(
                RichText::new(format!("Available: {} to {}", extent.start(), extent.end()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.add_space(5.0);
        }

        let label_width = 60.0;
        let field_width = 120.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Start:"));
            let edit = egui::TextEdit::singleline(&mut self.settings.start_text)
                .hint_text("YYYY-MM-DD")
                .desired_width(field_width);
            if ui.add(edit).changed() {
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("End:"));
            let edit = egui::TextEdit::singleline(&mut self.settings.end_text)
                .hint_text("YYYY-MM-DD")
                .desired_width(field_width);
            if ui.add(edit).changed() {
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.add_space(5.0);
        if ui
            .add_enabled(self.extent.is_some(), egui::Button::new("↺ Full Range"))
            .clicked()
        {
            action = ControlPanelAction::ResetRange;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Wind Section =====
        ui.label(RichText::new("💨 Wind Chart").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            let before = self.settings.wind_scope;
            ui.radio_value(&mut self.settings.wind_scope, WindScope::Dataset, "All dates");
            ui.radio_value(&mut self.settings.wind_scope, WindScope::Filtered, "Filtered");
            if self.settings.wind_scope != before {
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

fn parse_field(name: &str, text: &str) -> Result<Option<NaiveDate>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_iso_date(text)
        .map(Some)
        .ok_or_else(|| format!("{name} date '{text}' is not a valid YYYY-MM-DD date"))
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FilterChanged,
    ResetRange,
    ExportCharts,
}
