//! Cross-location totals and per-row derived value fields.

use std::collections::BTreeMap;

use crate::model::StockRecord;

/// Sum `on_hand` per design number and write the total back onto every
/// row sharing that key. The total is a read-back aggregate, not a
/// separate rollup table, so per-row and per-product views both query
/// the same rows.
pub fn broadcast_totals(rows: &mut [StockRecord]) {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows.iter() {
        *totals.entry(row.design_number.as_str()).or_insert(0) += row.on_hand;
    }
    let totals: BTreeMap<String, i64> = totals
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    for row in rows.iter_mut() {
        row.total_on_hand = totals[&row.design_number];
    }
}

/// Per-row stock and sale value. Upstream coercion guarantees the
/// operands, so there is nothing to fail here.
pub fn derive_values(rows: &mut [StockRecord]) {
    for row in rows {
        row.stock_value = row.on_hand as f64 * row.price_lk;
        row.sale_value = row.on_hand as f64 * row.sale_price;
    }
}
