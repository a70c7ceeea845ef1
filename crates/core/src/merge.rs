//! Canonical merger: union all per-source partial rows, then left-join
//! the sale catalog by design number.

use std::collections::BTreeMap;

use crate::model::{CatalogEntry, PartialRecord, StockRecord};

/// Index catalog entries by design number. Later entries for the same
/// code win, so the join below is strictly one-to-one.
pub fn index_catalog(entries: Vec<CatalogEntry>) -> BTreeMap<String, CatalogEntry> {
    let mut map = BTreeMap::new();
    for entry in entries {
        map.insert(entry.design_number.clone(), entry);
    }
    map
}

/// Left-join partial rows against the catalog. Every row keeps its
/// identity; a catalog hit contributes `mrp` and `sale_percentage`,
/// a miss leaves both absent. Loaders have already excluded rows with
/// no resolvable key, so no further filtering happens here.
pub fn join_catalog(
    partials: Vec<PartialRecord>,
    catalog: &BTreeMap<String, CatalogEntry>,
) -> Vec<StockRecord> {
    partials
        .into_iter()
        .map(|p| {
            let entry = catalog.get(&p.design_number);
            let mrp = entry.and_then(|e| e.mrp);
            let sale_percentage = entry.and_then(|e| e.sale_percentage);
            StockRecord {
                design_number: p.design_number,
                location: p.location,
                on_hand: p.on_hand,
                product_name: p.product_name,
                item_code: p.item_code,
                brand: p.brand,
                price_lk: p.price_lk,
                mrp,
                sale_percentage,
                // Filled by the price/sale resolution step.
                sale_price: 0.0,
                // Filled by the aggregation step.
                total_on_hand: 0,
                sale_flag: false,
                stock_value: 0.0,
                sale_value: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(design: &str, location: &str, on_hand: i64, price: f64) -> PartialRecord {
        PartialRecord {
            design_number: design.into(),
            location: location.into(),
            on_hand,
            product_name: format!("{design} item"),
            item_code: String::new(),
            brand: "LCY LONDON".into(),
            price_lk: price,
        }
    }

    #[test]
    fn join_attaches_catalog_fields() {
        let catalog = index_catalog(vec![CatalogEntry {
            design_number: "LN120".into(),
            mrp: Some(3000.0),
            sale_percentage: Some(20.0),
        }]);
        let rows = join_catalog(
            vec![partial("LN120", "Cinnamon Store", 3, 2500.0)],
            &catalog,
        );
        assert_eq!(rows[0].mrp, Some(3000.0));
        assert_eq!(rows[0].sale_percentage, Some(20.0));
    }

    #[test]
    fn join_miss_leaves_fields_absent() {
        let catalog = index_catalog(vec![]);
        let rows = join_catalog(vec![partial("LN197", "Warehouse", 5, 0.0)], &catalog);
        assert_eq!(rows[0].mrp, None);
        assert_eq!(rows[0].sale_percentage, None);
    }

    #[test]
    fn same_design_keeps_one_row_per_location() {
        let catalog = index_catalog(vec![]);
        let rows = join_catalog(
            vec![
                partial("LN1", "Warehouse", 5, 0.0),
                partial("LN1", "Cinnamon Store", 2, 1500.0),
            ],
            &catalog,
        );
        assert_eq!(rows.len(), 2, "no cross-location dedup");
    }

    #[test]
    fn duplicate_catalog_codes_last_wins() {
        let catalog = index_catalog(vec![
            CatalogEntry {
                design_number: "LN1".into(),
                mrp: Some(1000.0),
                sale_percentage: Some(10.0),
            },
            CatalogEntry {
                design_number: "LN1".into(),
                mrp: Some(1200.0),
                sale_percentage: Some(25.0),
            },
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["LN1"].mrp, Some(1200.0));
    }
}
