use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use sales_dashboard::ExportFormat;

use crate::state::{AppState, Category, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Returns `true` when the user changed the
/// criteria this frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.heading("Filter Data");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return false;
    }

    let mut changed = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= category_filter(ui, state, Category::Region, "Region");
            ui.separator();
            changed |= category_filter(ui, state, Category::Product, "Product");
            ui.separator();
            changed |= date_filter(ui, state);
        });
    changed
}

/// Collapsible checklist with All / None buttons.
fn category_filter(ui: &mut Ui, state: &mut AppState, category: Category, title: &str) -> bool {
    let options = state.options(category);
    let n_selected = options
        .iter()
        .filter(|v| state.is_selected(category, v))
        .count();
    let header_text = format!("{title}  ({n_selected}/{})", options.len());

    let mut changed = false;
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(category);
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    state.select_none(category);
                    changed = true;
                }
            });

            for value in &options {
                let mut text = RichText::new(value.as_str());
                if let Some(c) = state.color_for(category, value) {
                    text = text.color(c);
                }
                let mut checked = state.is_selected(category, value);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(category, value);
                    changed = true;
                }
            }
        });
    changed
}

fn date_filter(ui: &mut Ui, state: &mut AppState) -> bool {
    let Some(criteria) = &state.criteria else {
        return false;
    };
    let before = criteria.dates;
    let mut start = before.start;
    let mut end = before.end;

    ui.strong("Date Range");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("date_from"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("date_to"));
    });
    if start > end {
        ui.label(RichText::new("Start date is after end date").color(Color32::YELLOW));
    }

    if start != before.start || end != before.end {
        state.set_dates(start, end);
        return true;
    }
    false
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

        ui.add_enabled_ui(state.view.is_some(), |ui: &mut Ui| {
            ui.menu_button("Export", |ui: &mut Ui| {
                for format in ExportFormat::ALL {
                    if ui.button(format!("Download {}", format.label())).clicked() {
                        save_file_dialog(state, format);
                        ui.close_menu();
                    }
                }
            });
        });

        ui.separator();

        if let (Some(table), Some(view)) = (&state.table, &state.view) {
            let name = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let skipped = state.report.map_or(0, |r| r.dropped);
            ui.label(format!(
                "{name}: {} rows loaded ({skipped} skipped), {} shown",
                table.len(),
                view.filtered.len()
            ));
        }

        ui.separator();

        match &state.status {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(msg.as_str());
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Delimited text", &["csv", "txt", "tsv", "tab"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState, format: ExportFormat) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Download {}", format.label()))
        .set_file_name(format.file_name())
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        state.export_to(format, &path);
    }
}
