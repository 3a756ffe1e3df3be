mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{bail, Context};
use app::ExportDashboardApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    let mut state = AppState::default();
    state.load_path(&config.data);
    for city in &config.cities {
        if !state.selection.contains_key(city) {
            log::warn!("city '{city}' not found in {}", config.data.display());
        }
        state.set_city(city, true);
    }

    if let Some(out) = &config.export {
        if let Some(err) = &state.load_error {
            bail!("{err}");
        }
        return state
            .export_json(out)
            .with_context(|| format!("exporting dashboard to {}", out.display()));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard de Exportações para a França",
        options,
        Box::new(|_cc| Ok(Box::new(ExportDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
