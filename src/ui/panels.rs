use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::brush::BrushEvent;
use crate::config::SplomConfig;
use crate::data::metrics::MetricSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – metric and colour controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Metrics");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = dataset.column_names.clone();
    let numeric = dataset.numeric_columns();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Which columns to plot ----
            let all_numeric = state.config.metrics == MetricSelection::AllNumeric;
            ui.horizontal(|ui: &mut Ui| {
                if ui.selectable_label(!all_numeric, "Pick columns").clicked() && all_numeric {
                    let current = state
                        .splom
                        .as_ref()
                        .map(|s| s.metrics.clone())
                        .unwrap_or_default();
                    state.set_metric_selection(MetricSelection::Fixed(current));
                }
                if ui.selectable_label(all_numeric, "All numeric").clicked() {
                    state.set_metric_selection(MetricSelection::AllNumeric);
                }
            });

            let plotted: Vec<String> = match &state.config.metrics {
                MetricSelection::Fixed(names) => names.clone(),
                MetricSelection::AllNumeric => state
                    .splom
                    .as_ref()
                    .map(|s| s.metrics.clone())
                    .unwrap_or_default(),
            };
            for col in &numeric {
                let mut checked = plotted.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    state.toggle_metric(col);
                }
            }
            ui.separator();

            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current = state.config.category_column.clone();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_category_column(col.clone());
                        }
                    }
                });

            // ---- Legend ----
            if let Some(splom) = &state.splom {
                for (label, c) in splom.color_map.legend_entries() {
                    ui.label(
                        RichText::new(format!("● {label}"))
                            .color(Color32::from_rgb(c.red, c.green, c.blue)),
                    );
                }
            }
            ui.separator();

            // ---- Selection ----
            ui.strong("Selection");
            ui.label(format!(
                "{} of {} rows selected",
                state.view.visible_count(),
                state.view.hidden.len()
            ));
            if ui
                .add_enabled(state.view.brush.selection.is_some(), egui::Button::new("Clear"))
                .clicked()
            {
                state.brush(BrushEvent::Clear);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load config…").clicked() {
                open_config_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.splom.is_some(), egui::Button::new("Export SVG…"))
                .clicked()
            {
                export_svg_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} highlighted",
                ds.len(),
                state.view.visible_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn open_config_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load matrix config")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match SplomConfig::load(&path) {
            Ok(config) => {
                state.config = config;
                state.rebuild();
            }
            Err(e) => {
                log::error!("Failed to load config: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_svg_dialog(state: &mut AppState) {
    let Some(splom) = &state.splom else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export SVG")
        .add_filter("SVG", &["svg"])
        .set_file_name("splom.svg")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::svg::write_svg(splom, &state.view, &path) {
            log::error!("Failed to export SVG: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
