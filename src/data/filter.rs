use std::collections::{BTreeMap, BTreeSet};

use super::model::{DataError, TradeRecord, TradeTable, CITY};

// ---------------------------------------------------------------------------
// City catalog
// ---------------------------------------------------------------------------

/// Distinct city values, sorted ascending.
///
/// Fails with [`DataError::MissingColumn`] when the table has no `City`
/// column; callers then fall back to an empty catalog.
pub fn city_catalog(table: &TradeTable) -> Result<Vec<String>, DataError> {
    if !table.has_column(CITY) {
        return Err(DataError::MissingColumn(CITY.to_string()));
    }
    let unique: BTreeSet<&str> = table.records.iter().map(|r| r.city.as_str()).collect();
    Ok(unique.into_iter().map(str::to_string).collect())
}

// ---------------------------------------------------------------------------
// Selection state: which cities are checked
// ---------------------------------------------------------------------------

/// Maps city → checked flag. One entry per catalog city.
pub type CitySelection = BTreeMap<String, bool>;

/// Every city starts unchecked.
pub fn init_selection(catalog: &[String]) -> CitySelection {
    catalog.iter().map(|c| (c.clone(), false)).collect()
}

/// The checked cities, in alphabetical order.
pub fn selected_cities(selection: &CitySelection) -> BTreeSet<String> {
    selection
        .iter()
        .filter(|(_, checked)| **checked)
        .map(|(city, _)| city.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows whose city is among `selected`, in file order.
///
/// An empty selection yields an empty view: nothing selected, nothing shown.
pub fn filtered_view<'a>(table: &'a TradeTable, selected: &BTreeSet<String>) -> Vec<&'a TradeRecord> {
    if selected.is_empty() {
        return Vec::new();
    }
    table
        .records
        .iter()
        .filter(|rec| selected.contains(&rec.city))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, fob: f64) -> TradeRecord {
        TradeRecord {
            city: city.into(),
            sh2: "Food".into(),
            sh4: "Wheat".into(),
            fob,
            net_weight: 1.0,
        }
    }

    fn table(cities: &[&str]) -> TradeTable {
        let records = cities.iter().enumerate().map(|(i, c)| record(c, i as f64)).collect();
        TradeTable::new(records, vec![CITY.to_string()])
    }

    #[test]
    fn catalog_is_sorted_and_deduplicated() {
        let t = table(&["Franca", "Campinas", "Franca", "Barretos"]);
        assert_eq!(city_catalog(&t).unwrap(), vec!["Barretos", "Campinas", "Franca"]);
    }

    #[test]
    fn catalog_without_city_column_fails() {
        let t = TradeTable::new(vec![record("", 1.0)], vec!["US$ FOB".to_string()]);
        let err = city_catalog(&t).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == CITY));
    }

    #[test]
    fn selection_starts_unchecked() {
        let catalog = vec!["A".to_string(), "B".to_string()];
        let sel = init_selection(&catalog);
        assert_eq!(sel.len(), 2);
        assert!(sel.values().all(|&v| !v));
        assert!(selected_cities(&sel).is_empty());
    }

    #[test]
    fn view_keeps_selected_rows_in_order() {
        let t = table(&["A", "B", "A", "C"]);
        let selected: BTreeSet<String> = ["A", "C"].iter().map(|s| s.to_string()).collect();
        let view = filtered_view(&t, &selected);

        let fobs: Vec<f64> = view.iter().map(|r| r.fob).collect();
        assert_eq!(fobs, vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_selection_gives_empty_view() {
        let t = table(&["A", "B"]);
        assert!(filtered_view(&t, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn unknown_city_matches_nothing() {
        let t = table(&["A"]);
        let selected: BTreeSet<String> = ["Z".to_string()].into_iter().collect();
        assert!(filtered_view(&t, &selected).is_empty());
    }
}
