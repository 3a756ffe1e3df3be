use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::aggregate::{
    city_sh2_crosstab, sh2_distribution, top_products, value_by_city, value_weight_points,
};
use crate::data::filter::filtered_view;
use crate::data::model::{
    CrossTotal, GroupTotal, TradePoint, TradeTable, CITY, NET_WEIGHT, SH2_DESCRIPTION,
    SH4_DESCRIPTION, US_FOB,
};

// ---------------------------------------------------------------------------
// Chart description handed to the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    HorizontalBar,
    Donut,
    Heatmap,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "rows", rename_all = "snake_case")]
pub enum ChartData {
    Totals(Vec<GroupTotal>),
    CrossTotals(Vec<CrossTotal>),
    Points(Vec<TradePoint>),
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Totals(rows) => rows.is_empty(),
            ChartData::CrossTotals(rows) => rows.is_empty(),
            ChartData::Points(rows) => rows.is_empty(),
        }
    }
}

/// Everything the renderer needs to draw one chart:
/// `render(kind, data, x, y, color?, size?, hover, title)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Section heading shown above the chart.
    pub heading: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_field: &'static str,
    pub y_field: &'static str,
    pub color_field: Option<&'static str>,
    pub size_field: Option<&'static str>,
    pub hover_fields: Vec<&'static str>,
    /// Shown instead of the chart when `data` is empty.
    pub empty_message: &'static str,
    pub data: ChartData,
}

impl ChartSpec {
    fn new(
        heading: &str,
        title: &str,
        kind: ChartKind,
        x_field: &'static str,
        y_field: &'static str,
        data: ChartData,
    ) -> Self {
        ChartSpec {
            heading: heading.to_string(),
            title: title.to_string(),
            kind,
            x_field,
            y_field,
            color_field: None,
            size_field: None,
            hover_fields: vec![US_FOB],
            empty_message: "Nenhum dado para este gráfico nas cidades selecionadas.",
            data,
        }
    }

    fn color(mut self, field: &'static str) -> Self {
        self.color_field = Some(field);
        self
    }

    fn size(mut self, field: &'static str) -> Self {
        self.size_field = Some(field);
        self
    }

    fn hover(mut self, fields: &[&'static str]) -> Self {
        self.hover_fields = fields.to_vec();
        self
    }

    fn when_empty(mut self, msg: &'static str) -> Self {
        self.empty_message = msg;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dashboard: pure function of (table, selection)
// ---------------------------------------------------------------------------

pub const NO_SELECTION_PROMPT: &str = "Nenhuma cidade selecionada ainda. Por favor, selecione uma ou mais cidades na barra lateral para ver as análises.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    /// No city checked: show the prompt instead of charts.
    NoSelection { prompt: &'static str },
    Charts {
        selected: Vec<String>,
        /// Rows in the filtered view.
        rows: usize,
        charts: Vec<ChartSpec>,
    },
}

impl Dashboard {
    pub fn charts(&self) -> &[ChartSpec] {
        match self {
            Dashboard::NoSelection { .. } => &[],
            Dashboard::Charts { charts, .. } => charts,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Dashboard::NoSelection { .. } => 0,
            Dashboard::Charts { rows, .. } => *rows,
        }
    }
}

/// Filter the table by the selected cities and describe the five charts.
pub fn build_charts(table: &TradeTable, selected: &BTreeSet<String>) -> Dashboard {
    if selected.is_empty() {
        return Dashboard::NoSelection {
            prompt: NO_SELECTION_PROMPT,
        };
    }

    let view = filtered_view(table, selected);
    log::debug!(
        "rebuilding charts for {} cities ({} rows)",
        selected.len(),
        view.len()
    );

    let charts = vec![
        ChartSpec::new(
            "1. Valor Exportado por Cidade Selecionada",
            "Valor Exportado por Cidade",
            ChartKind::HorizontalBar,
            US_FOB,
            CITY,
            ChartData::Totals(value_by_city(&view)),
        )
        .color(US_FOB)
        .when_empty("Nenhum dado para o Gráfico 1 nas cidades selecionadas."),
        ChartSpec::new(
            "2. Distribuição do Valor Exportado por Categoria SH2 (Donut)",
            "Distribuição do Valor Exportado por Categoria SH2",
            ChartKind::Donut,
            SH2_DESCRIPTION,
            US_FOB,
            ChartData::Totals(sh2_distribution(&view)),
        )
        .color(SH2_DESCRIPTION)
        .when_empty("Nenhum dado de SH2 para as cidades selecionadas."),
        ChartSpec::new(
            "2.1 Distribuição do Valor Exportado por Categoria SH2 (Heatmap)",
            "Distribuição do Valor Exportado por Categoria (Heatmap)",
            ChartKind::Heatmap,
            CITY,
            SH2_DESCRIPTION,
            ChartData::CrossTotals(city_sh2_crosstab(&view)),
        )
        .color(US_FOB),
        ChartSpec::new(
            "3. Top 5 Produtos Mais Exportados nas Cidades Selecionadas (SH4 Description)",
            "Top 5 Produtos Exportados",
            ChartKind::HorizontalBar,
            US_FOB,
            SH4_DESCRIPTION,
            ChartData::Totals(top_products(&view)),
        )
        .color(SH4_DESCRIPTION)
        .when_empty("Nenhum produto para exibir nas cidades selecionadas."),
        ChartSpec::new(
            "4. Relação Valor (US$ FOB) vs. Peso Líquido (Net Weight)",
            "Relação Valor vs. Peso Líquido por Cidade",
            ChartKind::Scatter,
            NET_WEIGHT,
            US_FOB,
            ChartData::Points(value_weight_points(&view)),
        )
        .color(CITY)
        .size(US_FOB)
        .hover(&[CITY, US_FOB, NET_WEIGHT, SH2_DESCRIPTION, SH4_DESCRIPTION])
        .when_empty("Nenhum dado para a relação Valor vs. Peso Líquido nas cidades selecionadas."),
    ];

    Dashboard::Charts {
        selected: selected.iter().cloned().collect(),
        rows: view.len(),
        charts,
    }
}

/// Values are shown with two decimals everywhere.
pub fn format_fob(v: f64) -> String {
    format!("{v:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TradeRecord;

    fn rec(city: &str, sh2: &str, sh4: &str, fob: f64, weight: f64) -> TradeRecord {
        TradeRecord {
            city: city.into(),
            sh2: sh2.into(),
            sh4: sh4.into(),
            fob,
            net_weight: weight,
        }
    }

    fn scenario_table() -> TradeTable {
        TradeTable::new(
            vec![
                rec("A", "Food", "Wheat", 100.0, 10.0),
                rec("A", "Food", "Corn", 50.0, 5.0),
                rec("B", "Machinery", "Engine", 850.0, 200.0),
            ],
            [CITY, SH2_DESCRIPTION, SH4_DESCRIPTION, US_FOB, NET_WEIGHT]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
    }

    fn cities(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_shows_prompt() {
        let dash = build_charts(&scenario_table(), &BTreeSet::new());
        assert_eq!(
            dash,
            Dashboard::NoSelection {
                prompt: NO_SELECTION_PROMPT
            }
        );
        assert!(dash.charts().is_empty());
    }

    #[test]
    fn five_charts_in_display_order() {
        let dash = build_charts(&scenario_table(), &cities(&["A", "B"]));
        let kinds: Vec<ChartKind> = dash.charts().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::HorizontalBar,
                ChartKind::Donut,
                ChartKind::Heatmap,
                ChartKind::HorizontalBar,
                ChartKind::Scatter,
            ]
        );

        let first = &dash.charts()[0];
        assert_eq!(
            first.data,
            ChartData::Totals(vec![GroupTotal::new("A", 150.0), GroupTotal::new("B", 850.0)])
        );
        assert_eq!(first.x_field, US_FOB);
        assert_eq!(first.y_field, CITY);
    }

    #[test]
    fn scatter_carries_size_and_hover_fields() {
        let dash = build_charts(&scenario_table(), &cities(&["B"]));
        let scatter = &dash.charts()[4];
        assert_eq!(scatter.color_field, Some(CITY));
        assert_eq!(scatter.size_field, Some(US_FOB));
        assert_eq!(scatter.hover_fields.len(), 5);
        assert_eq!(
            scatter.data,
            ChartData::Points(vec![TradePoint {
                net_weight: 200.0,
                fob: 850.0,
                city: "B".into(),
                sh2: "Machinery".into(),
                sh4: "Engine".into(),
            }])
        );
    }

    #[test]
    fn selecting_an_absent_city_gives_empty_charts() {
        let dash = build_charts(&scenario_table(), &cities(&["Nowhere"]));
        assert_eq!(dash.charts().len(), 5);
        assert!(dash.charts().iter().all(ChartSpec::is_empty));
        assert_eq!(dash.row_count(), 0);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let table = scenario_table();
        let sel = cities(&["A", "B"]);
        let a = serde_json::to_string(&build_charts(&table, &sel)).unwrap();
        let b = serde_json::to_string(&build_charts(&table, &sel)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_with_tagged_shapes() {
        let dash = build_charts(&scenario_table(), &cities(&["A"]));
        let json = serde_json::to_value(&dash).unwrap();
        assert_eq!(json["status"], "charts");
        assert_eq!(json["charts"][0]["kind"], "horizontal_bar");
        assert_eq!(json["charts"][0]["data"]["shape"], "totals");
        assert_eq!(json["charts"][0]["data"]["rows"][0]["key"], "A");
    }

    #[test]
    fn fob_is_formatted_with_two_decimals() {
        assert_eq!(format_fob(1234.5), "1234.50");
    }
}
