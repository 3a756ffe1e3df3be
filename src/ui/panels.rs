use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – city filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtro por Cidades");
    ui.separator();

    if state.table.is_none() {
        ui.label("Nenhum arquivo carregado.");
        return;
    }
    if state.catalog.is_empty() {
        ui.label("Nenhuma cidade disponível.");
        return;
    }

    ui.label(format!(
        "{}/{} selecionadas",
        state.selected_count(),
        state.catalog.len()
    ));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Todas").clicked() {
            state.select_all();
        }
        if ui.small_button("Nenhuma").clicked() {
            state.select_none();
        }
    });
    ui.separator();

    // Clone so the loop can mutate the selection.
    let catalog = state.catalog.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for city in &catalog {
                let mut checked = state.selection.get(city).copied().unwrap_or(false);
                if ui.checkbox(&mut checked, city).changed() {
                    state.toggle_city(city);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Exportar JSON…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} linhas carregadas, {} visíveis",
                table.len(),
                state.dashboard.row_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir dados de exportação")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Exportar painel")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard.json")
        .save_file();

    if let Some(path) = file {
        match state.export_json(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export dashboard: {e:#}");
                state.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }
}
