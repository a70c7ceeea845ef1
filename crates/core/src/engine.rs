//! Pipeline orchestration: loaders → merge → catalog join → price/sale
//! resolution → aggregation → canonical table.

use std::collections::BTreeSet;

use crate::aggregate::{broadcast_totals, derive_values};
use crate::cache::fingerprint;
use crate::config::StockConfig;
use crate::error::StockError;
use crate::loader::{load_catalog, load_store, load_warehouse};
use crate::merge::{index_catalog, join_catalog};
use crate::model::{
    LoadStats, PartialRecord, SourceSet, StockRecord, StockTable, TableMeta, TableSummary,
};
use crate::price::annotate;

/// Build the canonical table for one source set. The whole computation
/// is synchronous and in-memory; either the full table is produced or
/// the run fails with no output.
pub fn run(config: &StockConfig, sources: &SourceSet) -> Result<StockTable, StockError> {
    let mut partials: Vec<PartialRecord> = Vec::new();
    let mut stats: Vec<LoadStats> = Vec::new();

    let (rows, wh_stats) = load_warehouse(&sources.warehouse, &config.warehouse, &config.brand)?;
    partials.extend(rows);
    stats.push(wh_stats);

    for (code, store_config) in &config.stores {
        let data = sources
            .stores
            .get(code)
            .ok_or_else(|| StockError::UnknownSource(format!("store '{code}' has no data")))?;
        let (rows, store_stats) = load_store(data, store_config, &config.brand)?;
        partials.extend(rows);
        stats.push(store_stats);
    }

    let (entries, catalog_stats) = load_catalog(&sources.catalog, &config.catalog)?;
    stats.push(catalog_stats);

    let catalog = index_catalog(entries);
    let mut rows = join_catalog(partials, &catalog);

    annotate(&mut rows);
    broadcast_totals(&mut rows);
    derive_values(&mut rows);

    let summary = summarize(&rows, &stats);

    Ok(StockTable {
        meta: TableMeta {
            config_name: config.name.clone(),
            brand: config.brand.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            built_at: chrono::Utc::now().to_rfc3339(),
            source_fingerprint: fingerprint(sources),
        },
        summary,
        stats,
        rows,
    })
}

/// Compute table-level counts from canonical rows and loader stats.
pub fn summarize(rows: &[StockRecord], stats: &[LoadStats]) -> TableSummary {
    let distinct: BTreeSet<&str> = rows.iter().map(|r| r.design_number.as_str()).collect();
    let sale_designs: BTreeSet<&str> = rows
        .iter()
        .filter(|r| r.sale_flag)
        .map(|r| r.design_number.as_str())
        .collect();

    TableSummary {
        total_rows: rows.len(),
        rows_skipped: stats.iter().map(|s| s.rows_skipped).sum(),
        distinct_designs: distinct.len(),
        total_units: rows.iter().map(|r| r.on_hand).sum(),
        sale_rows: rows.iter().filter(|r| r.sale_flag).count(),
        sale_designs: sale_designs.len(),
    }
}
