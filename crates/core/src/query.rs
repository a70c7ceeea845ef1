//! Query contract for the canonical table: set filters over brand and
//! location, an optional sale-only cut, and the summary metrics the
//! presentation layer reads.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::StockRecord;

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Row filter. `None` for a set means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    pub brands: Option<BTreeSet<String>>,
    pub locations: Option<BTreeSet<String>>,
    pub sale_only: bool,
}

impl StockFilter {
    pub fn matches(&self, record: &StockRecord) -> bool {
        if let Some(ref brands) = self.brands {
            if !brands.contains(&record.brand) {
                return false;
            }
        }
        if let Some(ref locations) = self.locations {
            if !locations.contains(&record.location) {
                return false;
            }
        }
        if self.sale_only && !record.sale_flag {
            return false;
        }
        true
    }
}

/// Apply a filter, preserving table order.
pub fn filter_rows<'a>(rows: &'a [StockRecord], filter: &StockFilter) -> Vec<&'a StockRecord> {
    rows.iter().filter(|r| filter.matches(r)).collect()
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Headline metrics over a (filtered) row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub unique_designs: usize,
    pub total_units: i64,
    pub sale_designs: usize,
    /// Sum of stock value at resolved prices.
    pub total_value: f64,
    /// Sum of stock value at sale prices.
    pub after_sale_value: f64,
    pub potential_loss: f64,
    /// Loss as a share of total value; defined 0 when total value is 0.
    pub loss_percentage: f64,
    pub sale_units: i64,
    pub sale_original_value: f64,
    pub sale_discounted_value: f64,
}

pub fn compute_metrics(rows: &[&StockRecord]) -> Metrics {
    let designs: BTreeSet<&str> = rows.iter().map(|r| r.design_number.as_str()).collect();
    let sale_designs: BTreeSet<&str> = rows
        .iter()
        .filter(|r| r.sale_flag)
        .map(|r| r.design_number.as_str())
        .collect();

    let total_value: f64 = rows.iter().map(|r| r.stock_value).sum();
    let after_sale_value: f64 = rows.iter().map(|r| r.sale_value).sum();
    let potential_loss = total_value - after_sale_value;
    let loss_percentage = if total_value > 0.0 {
        potential_loss / total_value * 100.0
    } else {
        0.0
    };

    let sale_rows: Vec<&&StockRecord> = rows.iter().filter(|r| r.sale_flag).collect();

    Metrics {
        unique_designs: designs.len(),
        total_units: rows.iter().map(|r| r.on_hand).sum(),
        sale_designs: sale_designs.len(),
        total_value,
        after_sale_value,
        potential_loss,
        loss_percentage,
        sale_units: sale_rows.iter().map(|r| r.on_hand).sum(),
        sale_original_value: sale_rows.iter().map(|r| r.stock_value).sum(),
        sale_discounted_value: sale_rows.iter().map(|r| r.sale_value).sum(),
    }
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

/// Sale rows rolled up by discount percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountBreakdown {
    pub sale_percentage: f64,
    pub designs: usize,
    pub units: i64,
    pub stock_value: f64,
    pub sale_value: f64,
    pub revenue_loss: f64,
}

/// Group sale rows by their discount percentage, ascending.
pub fn discount_breakdown(rows: &[&StockRecord]) -> Vec<DiscountBreakdown> {
    // Keyed in hundredths so fractional percentages order correctly.
    let mut groups: BTreeMap<i64, (f64, BTreeSet<String>, i64, f64, f64)> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.sale_flag) {
        let Some(pct) = row.sale_percentage else {
            continue;
        };
        let key = (pct * 100.0).round() as i64;
        let entry = groups
            .entry(key)
            .or_insert_with(|| (pct, BTreeSet::new(), 0, 0.0, 0.0));
        entry.1.insert(row.design_number.clone());
        entry.2 += row.on_hand;
        entry.3 += row.stock_value;
        entry.4 += row.sale_value;
    }

    groups
        .into_values()
        .map(|(pct, designs, units, stock_value, sale_value)| DiscountBreakdown {
            sale_percentage: pct,
            designs: designs.len(),
            units,
            stock_value,
            sale_value,
            revenue_loss: stock_value - sale_value,
        })
        .collect()
}

/// Sale stock rolled up per location, largest unit count first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBreakdown {
    pub location: String,
    pub units: i64,
    pub stock_value: f64,
    pub sale_value: f64,
    pub value_at_risk: f64,
}

pub fn location_breakdown(rows: &[&StockRecord]) -> Vec<LocationBreakdown> {
    let mut groups: BTreeMap<&str, (i64, f64, f64)> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.sale_flag) {
        let entry = groups.entry(row.location.as_str()).or_insert((0, 0.0, 0.0));
        entry.0 += row.on_hand;
        entry.1 += row.stock_value;
        entry.2 += row.sale_value;
    }

    let mut out: Vec<LocationBreakdown> = groups
        .into_iter()
        .map(|(location, (units, stock_value, sale_value))| LocationBreakdown {
            location: location.to_string(),
            units,
            stock_value,
            sale_value,
            value_at_risk: stock_value - sale_value,
        })
        .collect();
    out.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.location.cmp(&b.location)));
    out
}

/// One sale line item rolled up across locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItem {
    pub design_number: String,
    pub product_name: String,
    pub sale_percentage: f64,
    pub units: i64,
    pub stock_value: f64,
    pub sale_value: f64,
    pub value_at_risk: f64,
}

/// Sale rows rolled up per (design, product name, discount), the
/// `limit` largest by value at risk first.
pub fn top_sale_items(rows: &[&StockRecord], limit: usize) -> Vec<SaleItem> {
    // Percentage keyed in hundredths, same as the discount rollup.
    let mut groups: BTreeMap<(&str, &str, i64), (f64, i64, f64, f64)> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.sale_flag) {
        let Some(pct) = row.sale_percentage else {
            continue;
        };
        let key = (
            row.design_number.as_str(),
            row.product_name.as_str(),
            (pct * 100.0).round() as i64,
        );
        let entry = groups.entry(key).or_insert((pct, 0, 0.0, 0.0));
        entry.1 += row.on_hand;
        entry.2 += row.stock_value;
        entry.3 += row.sale_value;
    }

    let mut out: Vec<SaleItem> = groups
        .into_iter()
        .map(
            |((design, name, _), (pct, units, stock_value, sale_value))| SaleItem {
                design_number: design.to_string(),
                product_name: name.to_string(),
                sale_percentage: pct,
                units,
                stock_value,
                sale_value,
                value_at_risk: stock_value - sale_value,
            },
        )
        .collect();
    out.sort_by(|a, b| {
        b.value_at_risk
            .total_cmp(&a.value_at_risk)
            .then_with(|| a.design_number.cmp(&b.design_number))
    });
    out.truncate(limit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::record;

    fn sale_row(design: &str, location: &str, on_hand: i64, price: f64, pct: f64) -> StockRecord {
        let mut r = record(design, location, on_hand, price);
        r.sale_percentage = Some(pct);
        r.sale_flag = true;
        r.sale_price = price * (1.0 - pct / 100.0);
        r.sale_value = on_hand as f64 * r.sale_price;
        r
    }

    #[test]
    fn filter_by_location_and_sale() {
        let rows = vec![
            record("LN1", "Warehouse", 5, 100.0),
            sale_row("LN2", "Cinnamon Store", 2, 1000.0, 20.0),
            record("LN3", "Cinnamon Store", 1, 500.0),
        ];

        let filter = StockFilter {
            locations: Some(BTreeSet::from(["Cinnamon Store".to_string()])),
            ..Default::default()
        };
        assert_eq!(filter_rows(&rows, &filter).len(), 2);

        let filter = StockFilter {
            sale_only: true,
            ..Default::default()
        };
        let hits = filter_rows(&rows, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].design_number, "LN2");
    }

    #[test]
    fn filter_by_brand() {
        let mut other = record("LN9", "Warehouse", 1, 10.0);
        other.brand = "OTHER".into();
        let rows = vec![record("LN1", "Warehouse", 5, 100.0), other];

        let filter = StockFilter {
            brands: Some(BTreeSet::from(["LCY LONDON".to_string()])),
            ..Default::default()
        };
        assert_eq!(filter_rows(&rows, &filter).len(), 1);

        let unfiltered = StockFilter::default();
        assert_eq!(filter_rows(&rows, &unfiltered).len(), 2);
    }

    #[test]
    fn metrics_over_mixed_rows() {
        let rows = vec![
            record("LN1", "Warehouse", 5, 100.0),
            sale_row("LN2", "Cinnamon Store", 2, 1000.0, 20.0),
        ];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let m = compute_metrics(&refs);

        assert_eq!(m.unique_designs, 2);
        assert_eq!(m.total_units, 7);
        assert_eq!(m.sale_designs, 1);
        assert_eq!(m.total_value, 500.0 + 2000.0);
        assert_eq!(m.after_sale_value, 500.0 + 1600.0);
        assert_eq!(m.potential_loss, 400.0);
        assert!((m.loss_percentage - 16.0).abs() < 1e-9);
        assert_eq!(m.sale_units, 2);
        assert_eq!(m.sale_original_value, 2000.0);
        assert_eq!(m.sale_discounted_value, 1600.0);
    }

    #[test]
    fn loss_percentage_defined_zero_on_empty_value() {
        let rows = vec![record("LN1", "Warehouse", 5, 0.0)];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let m = compute_metrics(&refs);
        assert_eq!(m.total_value, 0.0);
        assert_eq!(m.loss_percentage, 0.0, "division by zero degrades to 0");
    }

    #[test]
    fn discount_breakdown_groups_by_percentage() {
        let rows = vec![
            sale_row("LN1", "Warehouse", 2, 1000.0, 20.0),
            sale_row("LN2", "Cinnamon Store", 3, 2000.0, 20.0),
            sale_row("LN3", "Warehouse", 1, 500.0, 50.0),
            record("LN4", "Warehouse", 9, 100.0),
        ];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let breakdown = discount_breakdown(&refs);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].sale_percentage, 20.0);
        assert_eq!(breakdown[0].designs, 2);
        assert_eq!(breakdown[0].units, 5);
        assert_eq!(breakdown[0].revenue_loss, (2000.0 + 6000.0) * 0.2);
        assert_eq!(breakdown[1].sale_percentage, 50.0);
        assert_eq!(breakdown[1].units, 1);
    }

    #[test]
    fn location_breakdown_sorts_by_units() {
        let rows = vec![
            sale_row("LN1", "Warehouse", 2, 1000.0, 10.0),
            sale_row("LN2", "Cinnamon Store", 5, 1000.0, 10.0),
        ];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let breakdown = location_breakdown(&refs);
        assert_eq!(breakdown[0].location, "Cinnamon Store");
        assert_eq!(breakdown[0].units, 5);
        assert_eq!(breakdown[1].location, "Warehouse");
        assert!((breakdown[0].value_at_risk - 500.0).abs() < 1e-9);
    }

    #[test]
    fn top_sale_items_merges_matching_lines_and_ranks_by_risk() {
        let rows = vec![
            sale_row("LN1", "Warehouse", 2, 1000.0, 20.0),
            sale_row("LN1", "Cinnamon Store", 3, 1000.0, 20.0),
            sale_row("LN2", "Warehouse", 1, 5000.0, 50.0),
            record("LN3", "Warehouse", 9, 100.0),
        ];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let items = top_sale_items(&refs, 10);

        // LN1 rows share design, name, and discount, so they merge.
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].design_number, "LN2");
        assert!((items[0].value_at_risk - 2500.0).abs() < 1e-9);
        assert_eq!(items[1].design_number, "LN1");
        assert_eq!(items[1].units, 5);
        assert!((items[1].value_at_risk - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn top_sale_items_honors_limit() {
        let rows = vec![
            sale_row("LN1", "Warehouse", 1, 100.0, 10.0),
            sale_row("LN2", "Warehouse", 1, 200.0, 10.0),
            sale_row("LN3", "Warehouse", 1, 300.0, 10.0),
        ];
        let refs: Vec<&StockRecord> = rows.iter().collect();
        let items = top_sale_items(&refs, 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].design_number, "LN3");
        assert_eq!(items[1].design_number, "LN2");
    }
}
