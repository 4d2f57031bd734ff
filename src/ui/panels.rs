use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::export;
use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Left side panel – view selector and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    if dataset.is_empty() {
        ui.label("Dataset is empty.");
        return;
    }

    // Clone what we need so we can mutate state inside the loops.
    let products: Vec<String> = dataset.products.iter().cloned().collect();
    let regions: Vec<String> = dataset.regions.iter().cloned().collect();
    let date_span = dataset.date_span;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- View selector ----
            ui.strong("View");
            egui::ComboBox::from_id_salt("chart_view")
                .selected_text(state.view.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for view in ChartView::ALL {
                        if ui
                            .selectable_label(state.view == view, view.label())
                            .clicked()
                        {
                            state.view = view;
                        }
                    }
                });
            ui.separator();

            // ---- Date range ----
            ui.strong("Date range");
            ui.horizontal(|ui: &mut Ui| {
                let mut start = state.criteria.start;
                if ui
                    .add(DatePickerButton::new(&mut start).id_salt("start_date"))
                    .changed()
                {
                    let end = state.criteria.end;
                    state.set_date_range(start, end);
                }
                ui.label("to");
                let mut end = state.criteria.end;
                if ui
                    .add(DatePickerButton::new(&mut end).id_salt("end_date"))
                    .changed()
                {
                    let start = state.criteria.start;
                    state.set_date_range(start, end);
                }
            });
            if state.criteria.start > state.criteria.end {
                ui.label(
                    RichText::new("Range start is after its end; nothing matches.")
                        .color(Color32::YELLOW)
                        .small(),
                );
            }
            ui.separator();

            // ---- Product filter ----
            let header = format!(
                "Products  ({}/{})",
                state.criteria.products.len(),
                products.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("products")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_products(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_products(false);
                        }
                    });
                    for label in &products {
                        let color = state.product_colors.color_for(label);
                        let mut checked = state.criteria.products.contains(label);
                        if ui
                            .checkbox(&mut checked, RichText::new(label).color(color))
                            .changed()
                        {
                            state.toggle_product(label);
                        }
                    }
                });
            ui.separator();

            // ---- Region filter ----
            let header = format!(
                "Regions  ({}/{})",
                state.criteria.regions.len(),
                regions.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("regions")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_regions(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_regions(false);
                        }
                    });
                    for label in &regions {
                        let color = state.region_colors.color_for(label);
                        let mut checked = state.criteria.regions.contains(label);
                        if ui
                            .checkbox(&mut checked, RichText::new(label).color(color))
                            .changed()
                        {
                            state.toggle_region(label);
                        }
                    }
                });
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }

            if let Some((lo, hi)) = date_span {
                ui.label(
                    RichText::new(format!("Data covers {lo} – {hi}"))
                        .small()
                        .weak(),
                );
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export filtered…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} after filters",
                ds.len(),
                state.filtered.len()
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
        .set_title("Open sales data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.set_source(path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let today = chrono::Local::now().date_naive();
    let file = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .set_file_name(export::default_filename(today))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::export_to_path(&path, &state.filtered) {
            Ok(()) => {
                log::info!(
                    "exported {} records to {}",
                    state.filtered.len(),
                    path.display()
                );
                state.status_message =
                    Some(format!("Exported {} records", state.filtered.len()));
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
