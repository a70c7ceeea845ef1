//! Per-source loaders: one raw file schema in, canonical-shaped partial
//! rows out. Rows without a resolvable design number never leave the
//! loader; the skip count is reported via [`LoadStats`].

use crate::coerce::{coerce_number, coerce_or_zero, coerce_quantity};
use crate::config::{CatalogConfig, StoreConfig, WarehouseConfig};
use crate::error::StockError;
use crate::key::{extract_direct, extract_embedded};
use crate::model::{CatalogEntry, LoadStats, PartialRecord};

/// Parse a CSV header row and resolve required column positions.
fn header_index(
    headers: &csv::StringRecord,
    source: &str,
    column: &str,
) -> Result<usize, StockError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| StockError::MissingColumn {
            source: source.into(),
            column: column.into(),
        })
}

fn reader_for(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes())
}

fn headers_of(reader: &mut csv::Reader<&[u8]>, source: &str) -> Result<csv::StringRecord, StockError> {
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|e| StockError::Io(format!("{source}: {e}")))
}

/// Warehouse master: structured code field, quantity, description.
/// No item code and no price at this source.
pub fn load_warehouse(
    data: &str,
    config: &WarehouseConfig,
    brand: &str,
) -> Result<(Vec<PartialRecord>, LoadStats), StockError> {
    let source = &config.location;
    let mut reader = reader_for(data);
    let headers = headers_of(&mut reader, source)?;

    let code_idx = header_index(&headers, source, &config.columns.code)?;
    let qty_idx = header_index(&headers, source, &config.columns.quantity)?;
    let desc_idx = header_index(&headers, source, &config.columns.description)?;

    let mut rows = Vec::new();
    let mut stats = LoadStats {
        source: source.clone(),
        rows_read: 0,
        rows_kept: 0,
        rows_skipped: 0,
    };

    for record in reader.records() {
        let record = record.map_err(|e| StockError::Io(format!("{source}: {e}")))?;
        stats.rows_read += 1;

        let Some(design_number) = extract_direct(record.get(code_idx).unwrap_or("")) else {
            stats.rows_skipped += 1;
            continue;
        };

        rows.push(PartialRecord {
            design_number,
            location: config.location.clone(),
            on_hand: coerce_quantity(record.get(qty_idx).unwrap_or("")),
            product_name: record.get(desc_idx).unwrap_or("").trim().to_string(),
            item_code: String::new(),
            brand: brand.to_string(),
            price_lk: 0.0,
        });
        stats.rows_kept += 1;
    }

    Ok((rows, stats))
}

/// Store extract: the design number is embedded in the free-text item
/// name, and the selling price arrives quoted with thousands separators.
pub fn load_store(
    data: &str,
    config: &StoreConfig,
    brand: &str,
) -> Result<(Vec<PartialRecord>, LoadStats), StockError> {
    let source = &config.location;
    let mut reader = reader_for(data);
    let headers = headers_of(&mut reader, source)?;

    let item_code_idx = header_index(&headers, source, &config.columns.item_code)?;
    let item_name_idx = header_index(&headers, source, &config.columns.item_name)?;
    let qty_idx = header_index(&headers, source, &config.columns.quantity)?;
    let price_idx = header_index(&headers, source, &config.columns.price)?;

    let mut rows = Vec::new();
    let mut stats = LoadStats {
        source: source.clone(),
        rows_read: 0,
        rows_kept: 0,
        rows_skipped: 0,
    };

    for record in reader.records() {
        let record = record.map_err(|e| StockError::Io(format!("{source}: {e}")))?;
        stats.rows_read += 1;

        let item_name = record.get(item_name_idx).unwrap_or("");
        let Some(design_number) = extract_embedded(item_name) else {
            stats.rows_skipped += 1;
            continue;
        };

        rows.push(PartialRecord {
            design_number,
            location: config.location.clone(),
            on_hand: coerce_quantity(record.get(qty_idx).unwrap_or("")),
            product_name: item_name.trim().to_string(),
            item_code: record.get(item_code_idx).unwrap_or("").trim().to_string(),
            brand: brand.to_string(),
            price_lk: coerce_or_zero(record.get(price_idx).unwrap_or("")),
        });
        stats.rows_kept += 1;
    }

    Ok((rows, stats))
}

/// Sale catalog: structured code, MRP, and a percentage with a trailing
/// `%`. Later entries for the same code replace earlier ones, keeping
/// the downstream join strictly one-to-one.
pub fn load_catalog(
    data: &str,
    config: &CatalogConfig,
) -> Result<(Vec<CatalogEntry>, LoadStats), StockError> {
    let source = "sale catalog";
    let mut reader = reader_for(data);
    let headers = headers_of(&mut reader, source)?;

    let code_idx = header_index(&headers, source, &config.columns.code)?;
    let mrp_idx = header_index(&headers, source, &config.columns.mrp)?;
    let pct_idx = header_index(&headers, source, &config.columns.sale_percentage)?;

    let mut entries = Vec::new();
    let mut stats = LoadStats {
        source: source.into(),
        rows_read: 0,
        rows_kept: 0,
        rows_skipped: 0,
    };

    for record in reader.records() {
        let record = record.map_err(|e| StockError::Io(format!("{source}: {e}")))?;
        stats.rows_read += 1;

        let Some(design_number) = extract_direct(record.get(code_idx).unwrap_or("")) else {
            stats.rows_skipped += 1;
            continue;
        };

        entries.push(CatalogEntry {
            design_number,
            mrp: coerce_number(record.get(mrp_idx).unwrap_or("")),
            sale_percentage: coerce_number(record.get(pct_idx).unwrap_or("")),
        });
        stats.rows_kept += 1;
    }

    Ok((entries, stats))
}
