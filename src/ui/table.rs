use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::weekday_label;
use crate::state::AppState;
use crate::ui::thousands;

// ---------------------------------------------------------------------------
// Filtered data table
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 20.0;

/// Render the filtered records as a scrollable table, source order.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let records = &state.filtered;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0)) // date
        .column(Column::remainder()) // product
        .column(Column::remainder()) // region
        .column(Column::auto().at_least(90.0)) // revenue
        .column(Column::auto().at_least(90.0)) // day of week
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Date");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Product");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Region");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Revenue");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Day");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let rec = &records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.date.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.product);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.region);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(thousands(rec.revenue));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(weekday_label(rec.weekday));
                });
            });
        });
}
