//! Memoized pipeline result.
//!
//! The pipeline is idempotent over its inputs, so the last built table
//! is kept keyed by a content fingerprint of the source file set. The
//! memo is dropped either when the fingerprint changes or on an
//! explicit refresh request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::StockConfig;
use crate::engine;
use crate::error::StockError;
use crate::model::{SourceSet, StockTable};

/// SHA-256 over the source file set, in deterministic order: warehouse,
/// stores by code, catalog. Store codes participate so renaming a store
/// is a visible change.
pub fn fingerprint(sources: &SourceSet) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"warehouse\0");
    hasher.update(sources.warehouse.as_bytes());
    for (code, data) in &sources.stores {
        hasher.update(b"\0store\0");
        hasher.update(code.as_bytes());
        hasher.update(b"\0");
        hasher.update(data.as_bytes());
    }
    hasher.update(b"\0catalog\0");
    hasher.update(sources.catalog.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read every source file for a config, resolving paths relative to
/// `base_dir`. A missing or unreadable file fails the whole read — no
/// partial source set is ever produced.
pub fn read_sources(config: &StockConfig, base_dir: &Path) -> Result<SourceSet, StockError> {
    let read = |file: &str| -> Result<String, StockError> {
        let path: PathBuf = base_dir.join(file);
        std::fs::read_to_string(&path)
            .map_err(|e| StockError::Io(format!("cannot read {}: {e}", path.display())))
    };

    let warehouse = read(&config.warehouse.file)?;
    let mut stores = BTreeMap::new();
    for (code, store) in &config.stores {
        stores.insert(code.clone(), read(&store.file)?);
    }
    let catalog = read(&config.catalog.file)?;

    Ok(SourceSet {
        warehouse,
        stores,
        catalog,
    })
}

/// Holds the last full pipeline result. Init on first call, rebuild on
/// input change, invalidate on explicit refresh.
#[derive(Default)]
pub struct TableCache {
    cached: Option<(String, StockTable)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized table when the source files are unchanged,
    /// otherwise rebuild from the current files. If the rebuild fails,
    /// the previous memo is kept.
    pub fn get_or_build(
        &mut self,
        config: &StockConfig,
        base_dir: &Path,
    ) -> Result<&StockTable, StockError> {
        let sources = read_sources(config, base_dir)?;
        let key = fingerprint(&sources);

        let hit = matches!(&self.cached, Some((k, _)) if *k == key);
        if !hit {
            let table = engine::run(config, &sources)?;
            self.cached = Some((key, table));
        }

        // The memo is guaranteed populated at this point.
        Ok(&self.cached.as_ref().expect("memo populated above").1)
    }

    /// Discard the memo. The next call recomputes from the current files.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
name = "Cache Test"

[warehouse]
file = "wh.csv"

[stores.CNM]
location = "Cinnamon Store"
file = "cnm.csv"

[catalog]
file = "sale.csv"
"#;

    fn write_fixtures(dir: &Path) {
        fs::write(
            dir.join("wh.csv"),
            "SKU,Stock QTY,Description\nLN 1,5,Polo\n",
        )
        .unwrap();
        fs::write(
            dir.join("cnm.csv"),
            "Item Code,Item Name,Qty,Selling Price\nC1,Ln1 Polo,2,1000\n",
        )
        .unwrap();
        fs::write(dir.join("sale.csv"), "product_code,MRP,Sale %\nln1,1500,10%\n").unwrap();
    }

    #[test]
    fn memo_hit_on_unchanged_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let config = StockConfig::from_toml(CONFIG).unwrap();

        let mut cache = TableCache::new();
        let first_built_at = cache
            .get_or_build(&config, dir.path())
            .unwrap()
            .meta
            .built_at
            .clone();
        let second_built_at = cache
            .get_or_build(&config, dir.path())
            .unwrap()
            .meta
            .built_at
            .clone();
        assert_eq!(first_built_at, second_built_at, "second call must be a memo hit");
    }

    #[test]
    fn changed_source_triggers_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let config = StockConfig::from_toml(CONFIG).unwrap();

        let mut cache = TableCache::new();
        let before = cache.get_or_build(&config, dir.path()).unwrap().rows.clone();
        assert_eq!(before[0].on_hand, 5);

        fs::write(
            dir.path().join("wh.csv"),
            "SKU,Stock QTY,Description\nLN 1,9,Polo\n",
        )
        .unwrap();
        let after = cache.get_or_build(&config, dir.path()).unwrap().rows.clone();
        assert_eq!(after[0].on_hand, 9);
    }

    #[test]
    fn refresh_reproduces_identical_table() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let config = StockConfig::from_toml(CONFIG).unwrap();

        let mut cache = TableCache::new();
        let before = cache.get_or_build(&config, dir.path()).unwrap();
        let rows = before.rows.clone();
        let summary = before.summary.clone();

        cache.invalidate();
        assert!(!cache.is_cached());

        let after = cache.get_or_build(&config, dir.path()).unwrap();
        assert_eq!(after.rows, rows, "unchanged sources must reproduce the table");
        assert_eq!(after.summary, summary);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        fs::remove_file(dir.path().join("sale.csv")).unwrap();
        let config = StockConfig::from_toml(CONFIG).unwrap();

        let mut cache = TableCache::new();
        let err = cache.get_or_build(&config, dir.path()).unwrap_err();
        assert!(matches!(err, StockError::Io(_)));
        assert!(!cache.is_cached(), "failed run must not leave a table behind");
    }

    #[test]
    fn fingerprint_distinguishes_store_codes() {
        let base = SourceSet {
            warehouse: "w".into(),
            stores: BTreeMap::from([("CNM".to_string(), "data".to_string())]),
            catalog: "c".into(),
        };
        let renamed = SourceSet {
            warehouse: "w".into(),
            stores: BTreeMap::from([("OGF".to_string(), "data".to_string())]),
            catalog: "c".into(),
        };
        assert_ne!(fingerprint(&base), fingerprint(&renamed));
    }
}
