/// egui rendering. Panels read and edit [`crate::state::AppState`]; they never
/// run the filter or aggregation themselves.

pub mod dashboard;
pub mod panels;
pub mod plot;
