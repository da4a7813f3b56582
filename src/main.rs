use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use sap_viewer::app::SapViewerApp;
use sap_viewer::data::filter::DEFAULT_MAX_OPTIONS;
use sap_viewer::state::AppState;

/// Browse and filter SAP spreadsheet exports.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Export to open at startup (.xlsx, .xls, .csv, .parquet, .json)
    file: Option<PathBuf>,

    /// Columns with more distinct values than this get no filter
    /// (the material code column always gets one)
    #[arg(long, default_value_t = DEFAULT_MAX_OPTIONS)]
    max_options: usize,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(cli.max_options);
    if let Some(path) = &cli.file {
        state.open_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SAP Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SapViewerApp::new(state)))),
    )
}
