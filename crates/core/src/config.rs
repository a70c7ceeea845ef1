use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::StockError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration for one reconciliation: a warehouse master file,
/// any number of store extracts, and a sale catalog.
///
/// Stores are keyed by a short code (e.g. `CNM`) and processed in code
/// order, so output row order is deterministic for a given config.
#[derive(Debug, Deserialize)]
pub struct StockConfig {
    pub name: String,
    /// Single-brand inventory: this label is stamped onto every row.
    #[serde(default = "default_brand")]
    pub brand: String,
    pub warehouse: WarehouseConfig,
    pub stores: BTreeMap<String, StoreConfig>,
    pub catalog: CatalogConfig,
}

fn default_brand() -> String {
    "LCY LONDON".into()
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    pub file: String,
    #[serde(default = "default_warehouse_location")]
    pub location: String,
    #[serde(default)]
    pub columns: WarehouseColumns,
}

fn default_warehouse_location() -> String {
    "Warehouse".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseColumns {
    #[serde(default = "default_wh_code")]
    pub code: String,
    #[serde(default = "default_wh_quantity")]
    pub quantity: String,
    #[serde(default = "default_wh_description")]
    pub description: String,
}

impl Default for WarehouseColumns {
    fn default() -> Self {
        Self {
            code: default_wh_code(),
            quantity: default_wh_quantity(),
            description: default_wh_description(),
        }
    }
}

fn default_wh_code() -> String {
    "SKU".into()
}
fn default_wh_quantity() -> String {
    "Stock QTY".into()
}
fn default_wh_description() -> String {
    "Description".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub location: String,
    pub file: String,
    #[serde(default)]
    pub columns: StoreColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreColumns {
    #[serde(default = "default_st_item_code")]
    pub item_code: String,
    #[serde(default = "default_st_item_name")]
    pub item_name: String,
    #[serde(default = "default_st_quantity")]
    pub quantity: String,
    #[serde(default = "default_st_price")]
    pub price: String,
}

impl Default for StoreColumns {
    fn default() -> Self {
        Self {
            item_code: default_st_item_code(),
            item_name: default_st_item_name(),
            quantity: default_st_quantity(),
            price: default_st_price(),
        }
    }
}

fn default_st_item_code() -> String {
    "Item Code".into()
}
fn default_st_item_name() -> String {
    "Item Name".into()
}
fn default_st_quantity() -> String {
    "Qty".into()
}
fn default_st_price() -> String {
    "Selling Price".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub file: String,
    #[serde(default)]
    pub columns: CatalogColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogColumns {
    #[serde(default = "default_cat_code")]
    pub code: String,
    #[serde(default = "default_cat_mrp")]
    pub mrp: String,
    #[serde(default = "default_cat_sale_percentage")]
    pub sale_percentage: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            code: default_cat_code(),
            mrp: default_cat_mrp(),
            sale_percentage: default_cat_sale_percentage(),
        }
    }
}

fn default_cat_code() -> String {
    "product_code".into()
}
fn default_cat_mrp() -> String {
    "MRP".into()
}
fn default_cat_sale_percentage() -> String {
    "Sale %".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl StockConfig {
    pub fn from_toml(input: &str) -> Result<Self, StockError> {
        let config: StockConfig =
            toml::from_str(input).map_err(|e| StockError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StockError> {
        if self.brand.trim().is_empty() {
            return Err(StockError::ConfigValidation("brand must not be empty".into()));
        }

        if self.stores.is_empty() {
            return Err(StockError::ConfigValidation(
                "at least one store is required".into(),
            ));
        }

        // Every stocking location must be distinct and non-empty
        let mut locations = vec![self.warehouse.location.as_str()];
        for (code, store) in &self.stores {
            if store.location.trim().is_empty() {
                return Err(StockError::ConfigValidation(format!(
                    "store '{code}': location must not be empty"
                )));
            }
            locations.push(store.location.as_str());
        }
        locations.sort_unstable();
        if let Some(dup) = locations.windows(2).find(|w| w[0] == w[1]) {
            return Err(StockError::ConfigValidation(format!(
                "duplicate location '{}'",
                dup[0]
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
