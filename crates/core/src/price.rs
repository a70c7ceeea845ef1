//! Price resolution and sale annotation, applied per row after the
//! catalog join. Each rule is a named pure function over one record.

use crate::model::StockRecord;

/// Resolve the final unit price. A positive store-quoted price is
/// authoritative; otherwise a positive catalog MRP fills in; otherwise
/// the row stays unpriced (0). Prices never go negative.
pub fn resolve_price(price_lk: f64, mrp: Option<f64>) -> f64 {
    if price_lk > 0.0 {
        return price_lk;
    }
    match mrp {
        Some(m) if m > 0.0 => m,
        _ => 0.0,
    }
}

/// Sale price: discount the resolved price when a sale percentage is
/// present, else the resolved price unchanged. Floored at 0 so a
/// percentage above 100 cannot produce a negative price.
pub fn sale_price_for(price_lk: f64, sale_percentage: Option<f64>) -> f64 {
    match sale_percentage {
        Some(pct) => (price_lk * (1.0 - pct / 100.0)).max(0.0),
        None => price_lk,
    }
}

/// A row is on sale iff the catalog supplied a percentage. Independent
/// of pricing: an unpriced row can still be flagged, with sale price 0.
pub fn sale_flag(sale_percentage: Option<f64>) -> bool {
    sale_percentage.is_some()
}

/// Apply all three rules to every row in place.
pub fn annotate(rows: &mut [StockRecord]) {
    for row in rows {
        row.price_lk = resolve_price(row.price_lk, row.mrp);
        row.sale_price = sale_price_for(row.price_lk, row.sale_percentage);
        row.sale_flag = sale_flag(row.sale_percentage);
    }
}
