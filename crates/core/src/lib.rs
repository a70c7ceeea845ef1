//! `stocktake-core` — Multi-source inventory reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded source file contents, returns
//! one canonical stock table. No CLI dependencies.

pub mod aggregate;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod key;
pub mod loader;
pub mod merge;
pub mod model;
pub mod price;
pub mod query;

pub use cache::TableCache;
pub use config::StockConfig;
pub use engine::run;
pub use error::StockError;
pub use model::{SourceSet, StockRecord, StockTable};
pub use query::StockFilter;
