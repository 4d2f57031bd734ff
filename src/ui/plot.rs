use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::analysis::aggregate;
use crate::data::model::{weekday_label, WEEK};
use crate::state::{AppState, ChartView};
use crate::ui::{table, thousands};

// ---------------------------------------------------------------------------
// Central panel – KPI strip + active chart view
// ---------------------------------------------------------------------------

/// Render the central panel for the active view.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV to analyze sales  (File → Open…)");
        });
        return;
    }

    kpi_strip(ui, state);
    ui.separator();

    if state.filtered.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No records match the current filters.");
        });
        return;
    }

    match state.view {
        ChartView::RevenueOverTime => revenue_over_time(ui, state),
        ChartView::ByRegion => region_bars(ui, state),
        ChartView::ByProduct => product_bars(ui, state),
        ChartView::RegionProductHeatmap => heatmap(ui, state),
        ChartView::WeekdayProfile => weekday_bars(ui, state),
        ChartView::MonthlyGrowth => growth_table(ui, state),
        ChartView::Table => table::data_table(ui, state),
    }
}

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let records = &state.filtered;
    let total = aggregate::total_revenue(records);
    let average = aggregate::average_revenue(records);
    let n_products = aggregate::distinct_count(records, |r| r.product.clone());
    let n_regions = aggregate::distinct_count(records, |r| r.region.clone());

    let by_product = aggregate::group_sum(records, |r| r.product.clone());
    let top_product = aggregate::max_entry(&by_product)
        .map(|(label, _)| label.clone())
        .unwrap_or_else(|| "–".to_string());

    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric(ui, "Total revenue", thousands(total));
        // An empty view has no mean; show a placeholder, not zero.
        metric(
            ui,
            "Average revenue",
            average.map(thousands).unwrap_or_else(|| "–".to_string()),
        );
        metric(ui, "Products", n_products.to_string());
        metric(ui, "Regions", n_regions.to_string());
        metric(ui, "Records", records.len().to_string());
        metric(ui, "Top product", top_product);
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.strong(value);
            ui.label(RichText::new(label).small().weak());
        });
    });
}

// ---------------------------------------------------------------------------
// Revenue over time – one line per product, daily sums
// ---------------------------------------------------------------------------

fn revenue_over_time(ui: &mut Ui, state: &AppState) {
    let daily = aggregate::group_sum(&state.filtered, |r| (r.product.clone(), r.date));

    let mut series: BTreeMap<String, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for ((product, date), sum) in daily {
        series.entry(product).or_default().push((date, sum));
    }

    Plot::new("revenue_over_time")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Revenue")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .show(ui, |plot_ui| {
            for (product, mut points) in series {
                points.sort_by_key(|&(date, _)| date);
                let pts: PlotPoints = points
                    .iter()
                    .map(|&(date, v)| [date.num_days_from_ce() as f64, v])
                    .collect();
                let color = state.product_colors.color_for(&product);
                plot_ui.line(Line::new(pts).name(&product).color(color).width(1.5));
            }
        });
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Category bar charts – descending, share of total in the name
// ---------------------------------------------------------------------------

fn region_bars(ui: &mut Ui, state: &AppState) {
    let sums = aggregate::group_sum(&state.filtered, |r| r.region.clone());
    let counts: std::collections::HashMap<String, usize> =
        aggregate::group_count(&state.filtered, |r| r.region.clone())
            .into_iter()
            .collect();
    let ranked = aggregate::top_n(&sums, sums.len());
    let total = aggregate::total_revenue(&state.filtered);

    let named: Vec<(String, f64, String)> = ranked
        .into_iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            let sales = counts.get(&label).copied().unwrap_or(0);
            let name = format!("{label} – {share:.1}% ({sales} sales)");
            (label, value, name)
        })
        .collect();

    let colors = &state.region_colors;
    category_bars(ui, "by_region", "Region", named, |label| {
        colors.color_for(label)
    });
}

fn product_bars(ui: &mut Ui, state: &AppState) {
    let sums = aggregate::group_sum(&state.filtered, |r| r.product.clone());
    let means: std::collections::HashMap<String, f64> =
        aggregate::group_mean(&state.filtered, |r| r.product.clone())
            .into_iter()
            .collect();
    let ranked = aggregate::top_n(&sums, sums.len());
    let total = aggregate::total_revenue(&state.filtered);

    if let (Some((leader, _)), Some((laggard, _))) =
        (ranked.first(), aggregate::bottom_n(&ranked, 1).first())
    {
        if leader != laggard {
            ui.label(format!("Leader: {leader}  ·  Laggard: {laggard}"));
        }
    }

    let named: Vec<(String, f64, String)> = ranked
        .into_iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            let mean = means.get(&label).copied().unwrap_or(0.0);
            let name = format!("{label} – {share:.1}% (avg sale {})", thousands(mean));
            (label, value, name)
        })
        .collect();

    let colors = &state.product_colors;
    category_bars(ui, "by_product", "Product", named, |label| {
        colors.color_for(label)
    });
}

fn category_bars(
    ui: &mut Ui,
    id: &str,
    axis: &str,
    named: Vec<(String, f64, String)>,
    color_for: impl Fn(&str) -> Color32,
) {
    let labels: Vec<String> = named.iter().map(|(label, _, _)| label.clone()).collect();

    let bars: Vec<Bar> = named
        .iter()
        .enumerate()
        .map(|(i, (label, value, name))| {
            Bar::new(i as f64, *value)
                .name(name)
                .fill(color_for(label))
        })
        .collect();

    Plot::new(id.to_string())
        .x_axis_label(axis.to_string())
        .y_axis_label("Revenue")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis label for integer bar positions; fractional grid marks get none.
fn index_label(labels: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 0.05 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Day-of-week profile – canonical Monday-first order
// ---------------------------------------------------------------------------

fn weekday_bars(ui: &mut Ui, state: &AppState) {
    let profile = aggregate::day_of_week_ranking(&state.filtered);
    let best = aggregate::max_entry(&profile).copied();

    let bars: Vec<Bar> = profile
        .iter()
        .enumerate()
        .map(|(i, &(day, value))| {
            Bar::new(i as f64, value)
                .name(weekday_label(day))
                .fill(Color32::from_rgb(69, 183, 209))
        })
        .collect();

    if let Some((day, value)) = best {
        if value > 0.0 {
            ui.label(format!(
                "Strongest day: {} ({})",
                weekday_label(day),
                thousands(value)
            ));
        }
    }

    Plot::new("weekday_profile")
        .x_axis_label("Day of week")
        .y_axis_label("Revenue")
        .x_axis_formatter(|mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 0.05 || !(0.0..7.0).contains(&i) {
                return String::new();
            }
            weekday_label(WEEK[i as usize]).to_string()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Region × product heatmap – painter-drawn from the pivot matrix
// ---------------------------------------------------------------------------

const LABEL_GUTTER_W: f32 = 90.0;
const LABEL_GUTTER_H: f32 = 22.0;
const TOTAL_GUTTER_W: f32 = 80.0;
const TOTAL_GUTTER_H: f32 = 20.0;

fn heatmap(ui: &mut Ui, state: &AppState) {
    let matrix = aggregate::pivot(
        &state.filtered,
        |r| r.region.as_str(),
        |r| r.product.as_str(),
    );
    if matrix.is_empty() {
        ui.label("Nothing to plot.");
        return;
    }

    let max = matrix.max_cell().max(1.0);
    let row_totals = matrix.row_totals();
    let col_totals = matrix.col_totals();
    let n_rows = matrix.row_labels.len();
    let n_cols = matrix.col_labels.len();

    let size = ui.available_size();
    let (rect, _response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let cell_w = (rect.width() - LABEL_GUTTER_W - TOTAL_GUTTER_W) / n_cols as f32;
    let cell_h = (rect.height() - LABEL_GUTTER_H - TOTAL_GUTTER_H) / n_rows as f32;
    let origin = rect.min + egui::vec2(LABEL_GUTTER_W, LABEL_GUTTER_H);

    for (c, label) in matrix.col_labels.iter().enumerate() {
        painter.text(
            origin + egui::vec2((c as f32 + 0.5) * cell_w, -LABEL_GUTTER_H * 0.5),
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
    }

    for (r, label) in matrix.row_labels.iter().enumerate() {
        painter.text(
            origin + egui::vec2(-8.0, (r as f32 + 0.5) * cell_h),
            Align2::RIGHT_CENTER,
            label,
            FontId::proportional(12.0),
            ui.visuals().text_color(),
        );

        for c in 0..n_cols {
            let value = matrix.cells[r][c];
            let t = (value / max) as f32;
            let cell = egui::Rect::from_min_size(
                origin + egui::vec2(c as f32 * cell_w, r as f32 * cell_h),
                egui::vec2(cell_w - 2.0, cell_h - 2.0),
            );
            painter.rect_filled(cell, egui::CornerRadius::same(2), heat_color(t));
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                thousands(value),
                FontId::proportional(11.0),
                if t > 0.6 { Color32::BLACK } else { Color32::WHITE },
            );
        }

        // Marginal row total on the right.
        painter.text(
            origin + egui::vec2(n_cols as f32 * cell_w + 8.0, (r as f32 + 0.5) * cell_h),
            Align2::LEFT_CENTER,
            thousands(row_totals[r]),
            FontId::proportional(11.0),
            ui.visuals().weak_text_color(),
        );
    }

    // Marginal column totals along the bottom.
    let total_y = n_rows as f32 * cell_h + TOTAL_GUTTER_H * 0.5;
    for (c, total) in col_totals.iter().enumerate() {
        painter.text(
            origin + egui::vec2((c as f32 + 0.5) * cell_w, total_y),
            Align2::CENTER_CENTER,
            thousands(*total),
            FontId::proportional(11.0),
            ui.visuals().weak_text_color(),
        );
    }
}

/// Two-stop gradient: deep blue → teal → yellow.
fn heat_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        ((23, 42, 80), (38, 166, 154), t * 2.0)
    } else {
        ((38, 166, 154), (255, 221, 85), (t - 0.5) * 2.0)
    };
    let lerp = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * local) as u8 };
    Color32::from_rgb(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

// ---------------------------------------------------------------------------
// Month-over-month growth table
// ---------------------------------------------------------------------------

fn growth_table(ui: &mut Ui, state: &AppState) {
    let entries = aggregate::monthly_growth(&state.filtered, |r| r.product.as_str());

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("growth_grid")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Product");
                    ui.strong("Month");
                    ui.strong("Revenue");
                    ui.strong("MoM change");
                    ui.end_row();

                    for entry in &entries {
                        ui.label(&entry.group);
                        ui.label(entry.month.to_string());
                        ui.label(thousands(entry.revenue));
                        match entry.growth_pct {
                            // First month per group: undefined, not zero.
                            None => ui.label(RichText::new("–").weak()),
                            Some(pct) => {
                                let color = if pct >= 0.0 {
                                    Color32::from_rgb(46, 160, 67)
                                } else {
                                    Color32::from_rgb(207, 34, 46)
                                };
                                ui.label(RichText::new(format!("{pct:+.1}%")).color(color))
                            }
                        };
                        ui.end_row();
                    }
                });
        });
}
