mod app;
mod cli;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use app::SalesDashboardApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

const WINDOW_TITLE: &str = "Sales Dashboard";
const DEFAULT_DATA_FILE: &str = "sales_data.csv";

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(command) => cli::run(command),
        None => launch_dashboard(cli.data),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Open the desktop window, preloading `data` (or `sales_data.csv` from the
/// working directory if it exists).
///
/// A file named explicitly must load: failure is reported in a blocking
/// dialog and the window is never opened.
fn launch_dashboard(data: Option<PathBuf>) -> Result<()> {
    let mut state = AppState::default();

    match data {
        Some(path) => match sales_dashboard::load_file(&path) {
            Ok(loaded) => state.set_table(loaded, path),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title(WINDOW_TITLE)
                    .set_description(format!("Could not load {}:\n{e}", path.display()))
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
                return Err(e.into());
            }
        },
        None => {
            let path = PathBuf::from(DEFAULT_DATA_FILE);
            if path.exists() {
                state.open(&path);
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(SalesDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("failed to start the dashboard window: {e}"))
}
