use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use sales_dashboard::{format_currency, Summary, Table};

use crate::state::{AppState, Category};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel: KPI cards, charts, raw data
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sales Dashboard");
            ui.label("Tracking sales across regions and products.");
            ui.add_space(8.0);

            kpi_row(ui, &view.summary);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].strong("Sales Over Time");
                plot::sales_over_time(&mut cols[0], &view.by_date);

                cols[1].strong("Sales by Region");
                plot::category_bars(&mut cols[1], "sales_by_region", &view.by_region, |label| {
                    state.color_for(Category::Region, label)
                });
            });

            ui.add_space(8.0);
            ui.strong("Sales by Product");
            plot::category_bars(ui, "sales_by_product", &view.by_product, |label| {
                state.color_for(Category::Product, label)
            });

            ui.separator();
            egui::CollapsingHeader::new("Show Raw Data Table")
                .default_open(false)
                .show(ui, |ui: &mut Ui| raw_table(ui, &view.filtered));
        });
}

fn kpi_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(3, |cols: &mut [Ui]| {
        kpi(&mut cols[0], "Total Sales", format_currency(summary.total_sales));
        kpi(&mut cols[1], "Total Quantity", (summary.total_quantity as i64).to_string());
        kpi(&mut cols[2], "Transactions", summary.count.to_string());
    });
}

fn kpi(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(title);
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

fn raw_table(ui: &mut Ui, table: &Table) {
    let columns = table.columns();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(72.0), columns.len())
        .header(20.0, |mut header| {
            for name in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let record = &table.records()[row.index()];
                for cell in table.row_cells(record) {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
