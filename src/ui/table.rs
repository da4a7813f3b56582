use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::column_label;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the visible rows in their original order.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a SAP export to get started  (File → Open…)");
            });
            return;
        }
    };

    let visible = &state.visible_indices;
    if visible.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(80.0).clip(true), dataset.column_count())
            .min_scrolled_height(0.0)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for name in &dataset.column_names {
                    header.col(|ui| {
                        ui.label(RichText::new(column_label(name)).strong())
                            .on_hover_text(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let idx = visible[row.index()];
                    row.col(|ui| {
                        ui.weak((idx + 1).to_string());
                    });
                    for cell in &dataset.rows[idx] {
                        row.col(|ui| {
                            ui.add(egui::Label::new(cell.to_string()).truncate());
                        });
                    }
                });
            });
    });
}
