use std::collections::BTreeMap;

use super::model::{CrossTotal, GroupTotal, TradePoint, TradeRecord};

/// Categories below this share of the total are merged into one slice.
pub const LONG_TAIL_THRESHOLD: f64 = 0.02;

/// How many products the ranking keeps.
pub const TOP_PRODUCTS: usize = 5;

/// Label of the synthetic category holding the long tail, e.g. `Outros (<2%)`.
pub fn long_tail_label() -> String {
    format!("Outros (<{:.0}%)", LONG_TAIL_THRESHOLD * 100.0)
}

// ---------------------------------------------------------------------------
// Grouping helper
// ---------------------------------------------------------------------------

/// Sum FOB per key. Groups come out in ascending key order.
fn sum_by<'a, F>(view: &[&'a TradeRecord], key: F) -> Vec<GroupTotal>
where
    F: Fn(&'a TradeRecord) -> &'a str,
{
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in view {
        *sums.entry(key(*rec)).or_insert(0.0) += rec.fob;
    }
    sums.into_iter()
        .map(|(k, fob)| GroupTotal::new(k, fob))
        .collect()
}

fn ascending_by_fob(groups: &mut [GroupTotal]) {
    // Stable: equal totals keep the key order they arrived in.
    groups.sort_by(|a, b| a.fob.total_cmp(&b.fob));
}

// ---------------------------------------------------------------------------
// The five routines
// ---------------------------------------------------------------------------

/// Total FOB per city, ascending by total.
pub fn value_by_city(view: &[&TradeRecord]) -> Vec<GroupTotal> {
    let mut groups = sum_by(view, |r| r.city.as_str());
    ascending_by_fob(&mut groups);
    groups
}

/// Total FOB per SH2 category with the long tail collapsed.
///
/// Every category under [`LONG_TAIL_THRESHOLD`] of the grand total is
/// removed and summed into a single trailing [`long_tail_label`] entry,
/// which is omitted when no category is that small.
pub fn sh2_distribution(view: &[&TradeRecord]) -> Vec<GroupTotal> {
    let groups = sum_by(view, |r| r.sh2.as_str());
    let total: f64 = groups.iter().map(|g| g.fob).sum();

    // A zero total leaves the share undefined (NaN), so nothing is collapsed.
    let (kept, small): (Vec<GroupTotal>, Vec<GroupTotal>) = groups
        .into_iter()
        .partition(|g| !(g.fob / total < LONG_TAIL_THRESHOLD));

    let mut out = kept;
    if !small.is_empty() {
        let tail: f64 = small.iter().map(|g| g.fob).sum();
        out.push(GroupTotal::new(long_tail_label(), tail));
    }
    out
}

/// Total FOB per (city, SH2) pair, ordered by city then SH2.
/// Pairs that never occur are absent.
pub fn city_sh2_crosstab(view: &[&TradeRecord]) -> Vec<CrossTotal> {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for rec in view {
        *sums
            .entry((rec.city.as_str(), rec.sh2.as_str()))
            .or_insert(0.0) += rec.fob;
    }
    sums.into_iter()
        .map(|((city, sh2), fob)| CrossTotal {
            city: city.to_string(),
            sh2: sh2.to_string(),
            fob,
        })
        .collect()
}

/// The [`TOP_PRODUCTS`] SH4 products with the largest total FOB,
/// ordered ascending for a horizontal bar chart.
///
/// Ranking is by total descending; equal totals rank by product name
/// ascending, so the cut at the boundary is deterministic. Equal totals
/// that survive the cut stay in name order after the final ascending sort.
pub fn top_products(view: &[&TradeRecord]) -> Vec<GroupTotal> {
    let mut groups = sum_by(view, |r| r.sh4.as_str());
    groups.sort_by(|a, b| b.fob.total_cmp(&a.fob));
    groups.truncate(TOP_PRODUCTS);
    ascending_by_fob(&mut groups);
    groups
}

/// One point per row: net weight against FOB.
pub fn value_weight_points(view: &[&TradeRecord]) -> Vec<TradePoint> {
    view.iter().map(|rec| TradePoint::from(*rec)).collect()
}
