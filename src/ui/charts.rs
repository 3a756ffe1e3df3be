use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{self, Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{format_fob, ChartData, ChartKind, ChartSpec, Dashboard};
use crate::color::{generate_palette, generate_pastel_palette, ColorMap, ColorScale};
use crate::data::model::{CrossTotal, GroupTotal, TradePoint};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 340.0;
const DONUT_HOLE: f64 = 0.4;

// ---------------------------------------------------------------------------
// Central panel: selected cities + the five charts
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("📊 Dashboard de Exportações para a França");

    if let Some(err) = &state.load_error {
        // Source unavailable: nothing past this point is computed or shown.
        ui.colored_label(Color32::RED, err);
        return;
    }
    if let Some(err) = &state.catalog_error {
        ui.colored_label(Color32::RED, err);
    }

    ui.separator();
    ui.heading("Cidades Selecionadas");

    let (selected, charts) = match &state.dashboard {
        Dashboard::NoSelection { prompt } => {
            info_box(ui, prompt);
            return;
        }
        Dashboard::Charts { selected, charts, .. } => (selected, charts),
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Você selecionou as seguintes cidades:");
            for city in selected {
                ui.label(format!("- {city}"));
            }

            ui.separator();
            ui.heading("Análises Gráficas");

            for (idx, spec) in charts.iter().enumerate() {
                ui.add_space(8.0);
                ui.strong(&spec.heading);
                if spec.is_empty() {
                    info_box(ui, spec.empty_message);
                    continue;
                }
                ui.vertical_centered(|ui: &mut Ui| ui.label(RichText::new(&spec.title).strong()));
                render(ui, idx, spec);
            }
        });
}

fn info_box(ui: &mut Ui, msg: &str) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(0xe8, 0xf1, 0xfb))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(format!("ℹ {msg}")).color(Color32::from_rgb(0x1c, 0x4e, 0x80)));
        });
}

/// Dispatch one chart description to its drawing routine.
pub fn render(ui: &mut Ui, idx: usize, spec: &ChartSpec) {
    let id = format!("chart_{idx}");
    match (&spec.kind, &spec.data) {
        (ChartKind::HorizontalBar, ChartData::Totals(rows)) => {
            if spec.color_field == Some(spec.x_field) {
                value_bars(ui, &id, spec, rows);
            } else {
                category_bars(ui, &id, spec, rows);
            }
        }
        (ChartKind::Donut, ChartData::Totals(rows)) => donut(ui, &id, rows),
        (ChartKind::Heatmap, ChartData::CrossTotals(rows)) => heatmap(ui, &id, spec, rows),
        (ChartKind::Scatter, ChartData::Points(rows)) => scatter(ui, &id, spec, rows),
        (kind, _) => {
            log::warn!("no renderer for {kind:?} with this data shape");
        }
    }
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label of the category drawn at integer position `value`, if any.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// One horizontal bar per group, coloured on a continuous scale by value.
fn value_bars(ui: &mut Ui, id: &str, spec: &ChartSpec, rows: &[GroupTotal]) {
    let scale = ColorScale::yl_gn_bu();
    let (min, max) = value_range(rows.iter().map(|g| g.fob));
    let labels: Vec<String> = rows.iter().map(|g| g.key.clone()).collect();

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.fob)
                .name(&g.key)
                .fill(scale.sample_range(g.fob, min, max))
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\nValor US$ FOB: {}", bar.name, format_fob(bar.value))
        }));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Valor US$ FOB")
        .y_axis_label(axis_title(spec.y_field))
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// One bar chart per group so each gets its own colour and legend entry.
fn category_bars(ui: &mut Ui, id: &str, spec: &ChartSpec, rows: &[GroupTotal]) {
    let palette = generate_palette(rows.len());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Valor US$ FOB")
        .y_axis_label(axis_title(spec.y_field))
        .show_axes([true, false])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (g, color)) in rows.iter().zip(palette.iter()).enumerate() {
                let bar = Bar::new(i as f64, g.fob).name(&g.key).fill(*color).width(0.7);
                let chart = BarChart::new(vec![bar])
                    .horizontal()
                    .name(&g.key)
                    .color(*color)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}\nValor US$ FOB: {}", bar.name, format_fob(bar.value))
                    }));
                plot_ui.bar_chart(chart);
            }
        });
}

fn axis_title(field: &str) -> &str {
    match field {
        "City" => "Cidade",
        "SH2 Description" => "Categoria SH2",
        "SH4 Description" => "Produto",
        "Net Weight" => "Peso Líquido",
        "US$ FOB" => "Valor US$ FOB",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Donut
// ---------------------------------------------------------------------------

/// Angular span `(start, end)` in radians of each slice, clockwise from 12 o'clock.
pub fn slice_angles(rows: &[GroupTotal]) -> Vec<(f64, f64)> {
    let total: f64 = rows.iter().map(|g| g.fob).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    rows.iter()
        .map(|g| {
            let end = start + g.fob / total * TAU;
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

fn polar(r: f64, angle: f64) -> [f64; 2] {
    // Angle 0 points up, increasing clockwise.
    [r * angle.sin(), r * angle.cos()]
}

/// Percent and value shown inside a slice.
pub fn slice_label(share: f64, fob: f64) -> String {
    format!("{:.1}%\n{}", share * 100.0, format_fob(fob))
}

fn donut(ui: &mut Ui, id: &str, rows: &[GroupTotal]) {
    let palette = generate_pastel_palette(rows.len());
    let total: f64 = rows.iter().map(|g| g.fob).sum();
    let angles = slice_angles(rows);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ((g, &(a0, a1)), color) in rows.iter().zip(angles.iter()).zip(palette.iter()) {
                // Split into thin convex segments; the plot fills convex polygons only.
                let steps = (((a1 - a0) / TAU) * 180.0).ceil().max(1.0) as usize;
                for s in 0..steps {
                    let b0 = a0 + (a1 - a0) * s as f64 / steps as f64;
                    let b1 = a0 + (a1 - a0) * (s + 1) as f64 / steps as f64;
                    let quad = vec![
                        polar(DONUT_HOLE, b0),
                        polar(1.0, b0),
                        polar(1.0, b1),
                        polar(DONUT_HOLE, b1),
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(quad))
                            .fill_color(*color)
                            .stroke(Stroke::new(0.0, *color))
                            .name(&g.key),
                    );
                }

                let share = g.fob / total;
                let mid = polar((1.0 + DONUT_HOLE) / 2.0, (a0 + a1) / 2.0);
                plot_ui.text(
                    Text::new(PlotPoint::new(mid[0], mid[1]), RichText::new(slice_label(share, g.fob)).size(11.0))
                        .color(Color32::BLACK)
                        .anchor(Align2::CENTER_CENTER),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, id: &str, spec: &ChartSpec, rows: &[CrossTotal]) {
    let scale = ColorScale::pu_rd();
    let (min, max) = value_range(rows.iter().map(|c| c.fob));

    let mut cities: Vec<String> = rows.iter().map(|c| c.city.clone()).collect();
    cities.dedup();
    let mut categories: Vec<String> = rows.iter().map(|c| c.sh2.clone()).collect();
    categories.sort();
    categories.dedup();

    fn index(labels: &[String], key: &str) -> usize {
        labels.iter().position(|l| l == key).unwrap_or(0)
    }
    let cells: BTreeMap<(usize, usize), f64> = rows
        .iter()
        .map(|c| ((index(&cities, &c.city), index(&categories, &c.sh2)), c.fob))
        .collect();

    let x_labels = cities.clone();
    let y_labels = categories.clone();
    let hover_cities = cities.clone();
    let hover_categories = categories.clone();
    let hover_cells = cells.clone();

    Plot::new(id)
        .height(CHART_HEIGHT.max(28.0 * categories.len() as f32))
        .x_axis_label(axis_title(spec.x_field))
        .y_axis_label(axis_title(spec.y_field))
        .show_grid(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| category_label(&x_labels, mark.value))
        .y_axis_formatter(move |mark, _range| category_label(&y_labels, mark.value))
        .label_formatter(move |_name, value| {
            let (x, y) = (value.x.round(), value.y.round());
            if x < 0.0 || y < 0.0 {
                return String::new();
            }
            match hover_cells.get(&(x as usize, y as usize)) {
                Some(fob) => format!(
                    "Cidade: {}\nSH2: {}\nValor US$ FOB: {}",
                    hover_cities[x as usize],
                    hover_categories[y as usize],
                    format_fob(*fob)
                ),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for (&(x, y), &fob) in &cells {
                let (x, y) = (x as f64, y as f64);
                let color = scale.sample_range(fob, min, max);
                let rect = vec![
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(rect))
                        .fill_color(color)
                        .stroke(Stroke::new(0.5, Color32::WHITE)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Marker radius in points, growing with the square root of the value.
pub fn marker_radius(fob: f64, max_fob: f64) -> f32 {
    if max_fob <= 0.0 || fob <= 0.0 {
        return 2.0;
    }
    (2.0 + 10.0 * (fob / max_fob).sqrt()) as f32
}

fn scatter(ui: &mut Ui, id: &str, spec: &ChartSpec, rows: &[TradePoint]) {
    let (_, max_fob) = value_range(rows.iter().map(|p| p.fob));
    let mut cities: Vec<&str> = rows.iter().map(|p| p.city.as_str()).collect();
    cities.sort();
    cities.dedup();
    let colors = ColorMap::new(cities.iter().copied());

    // One series per (city, radius) since a series has a single marker size.
    let mut series: BTreeMap<(&str, u32), Vec<[f64; 2]>> = BTreeMap::new();
    for p in rows {
        let radius = marker_radius(p.fob, max_fob).round() as u32;
        series
            .entry((p.city.as_str(), radius))
            .or_default()
            .push([p.net_weight, p.fob]);
    }

    let hover_rows = rows.to_vec();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(axis_title(spec.x_field))
        .y_axis_label(axis_title(spec.y_field))
        .label_formatter(move |name, value| {
            let hit = hover_rows
                .iter()
                .find(|p| p.city == name && p.net_weight == value.x && p.fob == value.y);
            match hit {
                Some(p) => format!(
                    "Cidade: {}\nValor US$ FOB: {}\nPeso Líquido: {:.2}\nSH2: {}\nSH4: {}",
                    p.city,
                    format_fob(p.fob),
                    p.net_weight,
                    p.sh2,
                    p.sh4
                ),
                None => format!("Peso Líquido: {:.2}\nValor US$ FOB: {}", value.x, format_fob(value.y)),
            }
        })
        .show(ui, |plot_ui| {
            for ((city, radius), pts) in series {
                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .radius(radius as f32)
                        .color(colors.color_for(city).gamma_multiply(0.8))
                        .name(city),
                );
            }
        });
}
