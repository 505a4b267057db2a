use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};
use sales_dashboard::{format_currency, GroupValue};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Sales over time (line chart)
// ---------------------------------------------------------------------------

/// Line chart of summed sales per day. The x axis counts days from the
/// common era so the plot can space points by real calendar distance.
pub fn sales_over_time(ui: &mut Ui, by_date: &[(GroupValue, f64)]) {
    let points: PlotPoints = by_date
        .iter()
        .filter_map(|(key, sales)| match key {
            GroupValue::Date(d) => Some([d.num_days_from_ce() as f64, *sales]),
            GroupValue::Label(_) => None,
        })
        .collect();

    Plot::new("sales_over_time")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Sales")
        .x_axis_formatter(|mark, _range| day_label(mark.value))
        .label_formatter(|_name, value| {
            format!("{}\n{}", day_label(value.x), format_currency(value.y))
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Sales")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}

fn day_label(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sales per category (bar chart)
// ---------------------------------------------------------------------------

/// One bar per group, in the order given, coloured by `color_for`.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    groups: &[(GroupValue, f64)],
    color_for: impl Fn(&str) -> Option<Color32>,
) {
    let labels: Vec<String> = groups.iter().map(|(key, _)| key.to_string()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .zip(&labels)
        .enumerate()
        .map(|(i, ((_, sales), label))| {
            Bar::new(i as f64, *sales)
                .name(label)
                .fill(color_for(label.as_str()).unwrap_or(Color32::LIGHT_BLUE))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("Sales")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_label(d.num_days_from_ce() as f64), "2024-02-29");
        assert_eq!(day_label(d.num_days_from_ce() as f64 + 0.3), "2024-02-29");
    }
}
