use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use eframe::egui::Color32;
use sales_dashboard::{
    apply, group_sum, load_file, summarize, Criteria, ExportFormat, GroupKey, GroupValue,
    LoadReport, Loaded, Summary, Table,
};

use crate::color::ColorMap;

/// Start hues, far apart so a region never shares a colour with a product.
const REGION_HUE: f32 = 200.0;
const PRODUCT_HUE: f32 = 20.0;

// ---------------------------------------------------------------------------
// Derived view: everything the central panel draws
// ---------------------------------------------------------------------------

/// Filtered table and its aggregates. Rebuilt from scratch whenever the
/// criteria change and never patched in place.
pub struct DashboardView {
    pub filtered: Table,
    pub summary: Summary,
    pub by_date: Vec<(GroupValue, f64)>,
    pub by_region: Vec<(GroupValue, f64)>,
    pub by_product: Vec<(GroupValue, f64)>,
}

impl DashboardView {
    pub fn compute(base: &Table, criteria: &Criteria) -> Self {
        let filtered = apply(base, criteria);
        DashboardView {
            summary: summarize(&filtered),
            by_date: group_sum(&filtered, GroupKey::Date),
            by_region: group_sum(&filtered, GroupKey::Region),
            by_product: group_sum(&filtered, GroupKey::Product),
            filtered,
        }
    }
}

/// Which multi-select a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Region,
    Product,
}

pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Base table (None until user loads a file). Never modified after load.
    pub table: Option<Table>,

    /// File the base table came from.
    pub source: Option<PathBuf>,

    /// Row accounting from the last successful load.
    pub report: Option<LoadReport>,

    /// Selections edited by the filter panel.
    pub criteria: Option<Criteria>,

    /// Result of the last recompute.
    pub view: Option<DashboardView>,

    pub region_colors: Option<ColorMap>,
    pub product_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    /// Load `path`, replacing the current table on success. On failure the
    /// current dashboard stays as it was and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(loaded) => self.set_table(loaded, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }

    /// Ingest a newly loaded table, select everything and compute the view.
    pub fn set_table(&mut self, loaded: Loaded, source: PathBuf) {
        let Loaded { table, report } = loaded;

        self.criteria = Some(Criteria::covering(&table));
        self.region_colors = Some(ColorMap::new(&table.distinct_regions(), REGION_HUE));
        self.product_colors = Some(ColorMap::new(&table.distinct_products(), PRODUCT_HUE));
        self.status = (report.dropped > 0).then(|| {
            Status::Info(format!("{} malformed rows were skipped", report.dropped))
        });
        self.report = Some(report);
        self.source = Some(source);
        self.table = Some(table);
        self.recompute();
    }

    /// Re-run filter and aggregation for the current criteria.
    pub fn recompute(&mut self) {
        self.view = match (&self.table, &self.criteria) {
            (Some(table), Some(criteria)) => Some(DashboardView::compute(table, criteria)),
            _ => None,
        };
    }

    /// All values a category can take in the base table, sorted.
    pub fn options(&self, category: Category) -> Vec<String> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        let values = match category {
            Category::Region => table.distinct_regions(),
            Category::Product => table.distinct_products(),
        };
        values.into_iter().collect()
    }

    /// Chart / checklist colour of a category value.
    pub fn color_for(&self, category: Category, value: &str) -> Option<Color32> {
        let map = match category {
            Category::Region => self.region_colors.as_ref(),
            Category::Product => self.product_colors.as_ref(),
        };
        map.map(|m| m.color_for(value))
    }

    pub fn is_selected(&self, category: Category, value: &str) -> bool {
        self.criteria.as_ref().is_some_and(|c| match category {
            Category::Region => c.regions.contains(value),
            Category::Product => c.products.contains(value),
        })
    }

    /// Toggle a single value in a multi-select.
    pub fn toggle(&mut self, category: Category, value: &str) {
        let Some(criteria) = &mut self.criteria else {
            return;
        };
        let selected = match category {
            Category::Region => &mut criteria.regions,
            Category::Product => &mut criteria.products,
        };
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select all values of a category.
    pub fn select_all(&mut self, category: Category) {
        let all = self.options(category).into_iter().collect();
        if let Some(criteria) = &mut self.criteria {
            match category {
                Category::Region => criteria.regions = all,
                Category::Product => criteria.products = all,
            }
        }
    }

    /// Deselect all values of a category.
    pub fn select_none(&mut self, category: Category) {
        if let Some(criteria) = &mut self.criteria {
            match category {
                Category::Region => criteria.regions.clear(),
                Category::Product => criteria.products.clear(),
            }
        }
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        if let Some(criteria) = &mut self.criteria {
            criteria.dates.start = start;
            criteria.dates.end = end;
        }
    }

    /// Export the current filtered table to `path`.
    pub fn export_to(&mut self, format: ExportFormat, path: &Path) {
        let Some(view) = &self.view else {
            return;
        };
        let result = format
            .export(&view.filtered)
            .with_context(|| format!("exporting {}", format.label()))
            .and_then(|bytes| {
                std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
            });
        self.status = Some(match result {
            Ok(()) => Status::Info(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                Status::Error(format!("Error: {e:#}"))
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_dashboard::load_str;

    fn state() -> AppState {
        let mut state = AppState::default();
        let loaded = load_str(
            "Date,Region,Product,Sales,Quantity\n\
             2024-01-01,East,Widget,100,2\n\
             2024-01-02,West,Gadget,50,1\n\
             bad,West,Gadget,50,1\n",
        )
        .unwrap();
        state.set_table(loaded, PathBuf::from("sales.csv"));
        state
    }

    #[test]
    fn loading_selects_everything() {
        let state = state();
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.summary.count, 2);
        assert!(matches!(state.status, Some(Status::Info(_))));
        assert_eq!(state.options(Category::Region), vec!["East", "West"]);
    }

    #[test]
    fn view_changes_only_on_recompute() {
        let mut state = state();
        state.toggle(Category::Region, "West");
        assert!(!state.is_selected(Category::Region, "West"));
        assert_eq!(state.view.as_ref().unwrap().summary.count, 2);

        state.recompute();
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.summary.count, 1);
        assert_eq!(view.summary.total_sales, 100.0);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = state();
        state.select_none(Category::Product);
        state.recompute();
        assert!(state.view.as_ref().unwrap().filtered.is_empty());

        state.select_all(Category::Product);
        state.recompute();
        assert_eq!(state.view.as_ref().unwrap().filtered.len(), 2);
    }

    #[test]
    fn all_malformed_file_gives_pickable_dates() {
        let mut state = AppState::default();
        let loaded = load_str(
            "Date,Region,Product,Sales,Quantity\n\
             bad,East,Widget,1,1\n",
        )
        .unwrap();
        state.set_table(loaded, PathBuf::from("sales.csv"));

        assert!(state.view.as_ref().unwrap().filtered.is_empty());
        let dates = state.criteria.as_ref().unwrap().dates;
        for day in [dates.start, dates.end] {
            assert!(day.checked_sub_days(chrono::Days::new(7)).is_some());
            assert!(day.checked_add_days(chrono::Days::new(7)).is_some());
        }
        assert_eq!(state.report.unwrap().dropped, 1);
    }

    #[test]
    fn failed_open_keeps_current_table() {
        let mut state = state();
        state.open(Path::new("/no/such/file.csv"));
        assert!(matches!(state.status, Some(Status::Error(_))));
        assert_eq!(state.view.as_ref().unwrap().summary.count, 2);
    }
}
