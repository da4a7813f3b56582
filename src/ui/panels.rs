use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No file loaded.");
        return;
    }
    if state.filter_columns.is_empty() {
        ui.label("No column has values to filter on.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let columns = state.filter_columns.clone();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for fc in &columns {
                let n_selected = state.filters.get(&fc.column).map_or(0, |s| s.len());
                let n_total = fc.options.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", fc.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(&fc.column)
                    .default_open(fc.is_material)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(&fc.column);
                            }
                            if ui.small_button("Clear").clicked() {
                                state.clear_selection(&fc.column);
                            }
                        });

                        // Re-borrow after potential mutation from All/Clear
                        let selected = state.filters.entry(fc.column.clone()).or_default();

                        for val in &fc.options {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                                changed = true;
                            }
                        }
                    });
            }
        });

    // Recompute visible indices after any checkbox changes.
    if changed {
        state.refilter();
    }
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            match &ds.material_column {
                Some(col) => ui.label(format!("Material column: {col}")),
                None => ui.label("No material column"),
            };
        }

        ui.separator();

        let n_active = state.active_filter_count();
        if ui
            .add_enabled(n_active > 0, egui::Button::new(format!("Clear filters ({n_active})")))
            .clicked()
        {
            state.clear_all_filters();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open SAP export")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
