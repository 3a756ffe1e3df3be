use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{build_charts, Dashboard, NO_SELECTION_PROMPT};
use crate::data::filter::{city_catalog, init_selection, selected_cities, CitySelection};
use crate::data::loader::load_file;
use crate::data::model::TradeTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file loads successfully).
    pub table: Option<TradeTable>,

    /// Path of the current (or last attempted) data file.
    pub data_path: Option<PathBuf>,

    /// Sorted distinct cities, one checkbox each.
    pub catalog: Vec<String>,

    /// City → checked.
    pub selection: CitySelection,

    /// Charts for the current selection, rebuilt on every change.
    pub dashboard: Dashboard,

    /// Set when the source could not be loaded; nothing else is shown.
    pub load_error: Option<String>,

    /// Set when the City column is absent; filtering is disabled.
    pub catalog_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            data_path: None,
            catalog: Vec::new(),
            selection: CitySelection::new(),
            dashboard: Dashboard::NoSelection {
                prompt: NO_SELECTION_PROMPT,
            },
            load_error: None,
            catalog_error: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path`, replacing the current table. On failure the session is
    /// halted: the previous table is dropped and only the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        self.data_path = Some(path.to_path_buf());
        match load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.columns
                );
                self.set_table(table);
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load file: {e:#}");
                *self = AppState {
                    data_path: Some(path.to_path_buf()),
                    load_error: Some(format!("Erro: {e:#}")),
                    ..AppState::default()
                };
            }
        }
    }

    /// Ingest a newly loaded table, build the city catalog and reset the selection.
    pub fn set_table(&mut self, table: TradeTable) {
        self.catalog = match city_catalog(&table) {
            Ok(catalog) => {
                self.catalog_error = None;
                catalog
            }
            Err(e) => {
                log::warn!("{e}");
                self.catalog_error = Some(format!("Erro: {e}"));
                Vec::new()
            }
        };
        self.selection = init_selection(&self.catalog);
        self.table = Some(table);
        self.load_error = None;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the dashboard after a selection change.
    pub fn refresh(&mut self) {
        let selected = selected_cities(&self.selection);
        self.dashboard = match &self.table {
            Some(table) => build_charts(table, &selected),
            None => Dashboard::NoSelection {
                prompt: NO_SELECTION_PROMPT,
            },
        };
    }

    /// Check or uncheck a city. Unknown names are ignored.
    pub fn set_city(&mut self, city: &str, checked: bool) {
        if let Some(flag) = self.selection.get_mut(city) {
            if *flag != checked {
                *flag = checked;
                log::debug!("city '{city}' checked: {checked}");
                self.refresh();
            }
        }
    }

    /// Flip a single city's checkbox.
    pub fn toggle_city(&mut self, city: &str) {
        if let Some(&checked) = self.selection.get(city) {
            self.set_city(city, !checked);
        }
    }

    pub fn select_all(&mut self) {
        self.selection.values_mut().for_each(|v| *v = true);
        self.refresh();
    }

    pub fn select_none(&mut self) {
        self.selection.values_mut().for_each(|v| *v = false);
        self.refresh();
    }

    /// Number of checked cities.
    pub fn selected_count(&self) -> usize {
        self.selection.values().filter(|v| **v).count()
    }

    /// Write the current dashboard as pretty JSON; `-` means stdout.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.dashboard)
            .context("serializing dashboard")?;
        if path.as_os_str() == "-" {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{json}").context("writing to stdout")?;
        } else {
            std::fs::write(path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("Exported dashboard to {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::data::model::GroupTotal;

    const CSV: &str = "City,SH2 Description,SH4 Description,US$ FOB,Net Weight\n\
                       A,Food,Wheat,100,10\n\
                       A,Food,Corn,50,5\n\
                       B,Machinery,Engine,850,200\n";

    fn loaded(content: &str) -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let mut state = AppState::default();
        state.load_path(file.path());
        (state, file)
    }

    #[test]
    fn fresh_load_has_nothing_selected() {
        let (state, _f) = loaded(CSV);
        assert_eq!(state.catalog, vec!["A", "B"]);
        assert_eq!(state.selected_count(), 0);
        assert!(matches!(state.dashboard, Dashboard::NoSelection { .. }));
        assert!(state.load_error.is_none());
    }

    #[test]
    fn toggling_rebuilds_the_charts() {
        let (mut state, _f) = loaded(CSV);
        state.toggle_city("A");
        state.toggle_city("B");

        match &state.dashboard {
            Dashboard::Charts { selected, rows, charts } => {
                assert_eq!(selected, &vec!["A".to_string(), "B".to_string()]);
                assert_eq!(*rows, 3);
                assert_eq!(
                    charts[0].data,
                    ChartData::Totals(vec![GroupTotal::new("A", 150.0), GroupTotal::new("B", 850.0)])
                );
            }
            other => panic!("expected charts, got {other:?}"),
        }

        state.select_none();
        assert!(matches!(state.dashboard, Dashboard::NoSelection { .. }));
        state.select_all();
        assert_eq!(state.selected_count(), 2);
    }

    #[test]
    fn unknown_city_is_ignored() {
        let (mut state, _f) = loaded(CSV);
        state.set_city("Nowhere", true);
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn missing_file_halts_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load_path(&dir.path().join("exportacoes_franca.csv"));

        assert!(state.load_error.as_deref().unwrap().contains("exportacoes_franca.csv"));
        assert!(state.table.is_none());
        assert!(state.catalog.is_empty());
        assert!(state.dashboard.charts().is_empty());
    }

    #[test]
    fn missing_city_column_disables_filtering() {
        let (mut state, _f) = loaded("SH2 Description,SH4 Description,US$ FOB,Net Weight\nFood,Wheat,1,2\n");
        assert!(state.table.is_some());
        assert!(state.catalog.is_empty());
        assert!(state.catalog_error.as_deref().unwrap().contains("City"));

        state.select_all();
        assert!(matches!(state.dashboard, Dashboard::NoSelection { .. }));
    }

    #[test]
    fn exports_json_to_file() {
        let (mut state, _f) = loaded(CSV);
        state.set_city("B", true);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dashboard.json");
        state.export_json(&out).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["selected"][0], "B");
        assert_eq!(json["charts"].as_array().unwrap().len(), 5);
    }
}
