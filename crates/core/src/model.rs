use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw source file contents, pre-loaded by the caller. Store extracts are
/// keyed by store code.
#[derive(Debug)]
pub struct SourceSet {
    pub warehouse: String,
    pub stores: BTreeMap<String, String>,
    pub catalog: String,
}

// ---------------------------------------------------------------------------
// Loader output
// ---------------------------------------------------------------------------

/// One normalized row from a single source, before the catalog join.
#[derive(Debug, Clone)]
pub struct PartialRecord {
    pub design_number: String,
    pub location: String,
    pub on_hand: i64,
    pub product_name: String,
    /// Store-local item code; empty for the warehouse, which has none.
    pub item_code: String,
    pub brand: String,
    /// Store-quoted unit price; 0 means "unpriced" at this source.
    pub price_lk: f64,
}

/// One sale-catalog entry, keyed by design number.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub design_number: String,
    pub mrp: Option<f64>,
    pub sale_percentage: Option<f64>,
}

/// Per-source ingestion counts. Key-extraction failures are silent at
/// the row level but observable here.
#[derive(Debug, Clone, Serialize)]
pub struct LoadStats {
    pub source: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

// ---------------------------------------------------------------------------
// Canonical table
// ---------------------------------------------------------------------------

/// The unit of the canonical table: one row per (design_number, location)
/// occurrence across all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRecord {
    pub design_number: String,
    pub location: String,
    pub on_hand: i64,
    pub product_name: String,
    pub item_code: String,
    pub brand: String,
    /// Resolved unit price; 0 means "unpriced".
    pub price_lk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_percentage: Option<f64>,
    pub sale_price: f64,
    /// Sum of `on_hand` across every row sharing this design number,
    /// broadcast back onto each of those rows.
    pub total_on_hand: i64,
    pub sale_flag: bool,
    pub stock_value: f64,
    pub sale_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableMeta {
    pub config_name: String,
    pub brand: String,
    pub engine_version: String,
    pub built_at: String,
    /// SHA-256 over the source file set; identifies the inputs that
    /// produced this table.
    pub source_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub total_rows: usize,
    pub rows_skipped: usize,
    pub distinct_designs: usize,
    pub total_units: i64,
    pub sale_rows: usize,
    pub sale_designs: usize,
}

/// The canonical table: sole artifact exposed downstream. Rebuilt in
/// full on every run; never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct StockTable {
    pub meta: TableMeta,
    pub summary: TableSummary,
    pub stats: Vec<LoadStats>,
    pub rows: Vec<StockRecord>,
}
