// stocktake CLI - headless inventory reconciliation

mod exit_codes;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use stocktake_core::config::StockConfig;
use stocktake_core::export::write_display_csv;
use stocktake_core::model::StockTable;
use stocktake_core::query::filter_rows;
use stocktake_core::{StockError, StockFilter};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "stocktake")]
#[command(about = "Reconcile warehouse and store inventory extracts into one canonical table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the canonical stock table from a TOML config
    #[command(after_help = "\
Examples:
  stocktake build may-stock.stock.toml
  stocktake build may-stock.stock.toml --json
  stocktake build may-stock.stock.toml --output table.json")]
    Build {
        /// Path to the .stock.toml config file
        config: PathBuf,

        /// Output the full table as JSON to stdout instead of a summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export the canonical table as a display CSV
    #[command(after_help = "\
Examples:
  stocktake export may-stock.stock.toml
  stocktake export may-stock.stock.toml --sale-only -o sale-items.csv
  stocktake export may-stock.stock.toml --location Warehouse --location 'Cinnamon Store'")]
    Export {
        /// Path to the .stock.toml config file
        config: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Only rows flagged as sale items
        #[arg(long)]
        sale_only: bool,

        /// Restrict to these locations. Repeatable.
        #[arg(long)]
        location: Vec<String>,

        /// Restrict to these brands. Repeatable.
        #[arg(long)]
        brand: Vec<String>,
    },

    /// Validate a stock config without running
    Validate {
        /// Path to the .stock.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            config,
            json,
            output,
        } => cmd_build(config, json, output),
        Commands::Export {
            config,
            output,
            sale_only,
            location,
            brand,
        } => cmd_export(config, output, sale_only, location, brand),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn config(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_INVALID_CONFIG,
            message: msg.into(),
            hint: None,
        }
    }

    fn runtime(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_RUNTIME,
            message: msg.into(),
            hint: None,
        }
    }
}

// ============================================================================
// build
// ============================================================================

/// Load the config and run the full pipeline. Source paths resolve
/// relative to the config file's directory.
fn build_table(config_path: &Path) -> Result<(StockConfig, StockTable), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = StockConfig::from_toml(&config_str).map_err(|e| match e {
        StockError::ConfigParse(_) | StockError::ConfigValidation(_) => {
            CliError::config(e.to_string())
        }
        other => CliError::runtime(other.to_string()),
    })?;

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let sources = stocktake_core::cache::read_sources(&config, base_dir)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    let table =
        stocktake_core::run(&config, &sources).map_err(|e| CliError::runtime(e.to_string()))?;

    Ok((config, table))
}

fn cmd_build(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let (_, table) = build_table(&config_path)?;

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&table)
            .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &table.summary;
    eprintln!(
        "{}: {} rows ({} skipped), {} designs, {} units — {} designs on sale",
        table.meta.config_name,
        s.total_rows,
        s.rows_skipped,
        s.distinct_designs,
        s.total_units,
        s.sale_designs,
    );

    Ok(())
}

// ============================================================================
// export
// ============================================================================

fn make_filter(sale_only: bool, locations: Vec<String>, brands: Vec<String>) -> StockFilter {
    let to_set = |v: Vec<String>| -> Option<BTreeSet<String>> {
        if v.is_empty() {
            None
        } else {
            Some(v.into_iter().collect())
        }
    };
    StockFilter {
        brands: to_set(brands),
        locations: to_set(locations),
        sale_only,
    }
}

fn cmd_export(
    config_path: PathBuf,
    output_file: Option<PathBuf>,
    sale_only: bool,
    locations: Vec<String>,
    brands: Vec<String>,
) -> Result<(), CliError> {
    let (_, table) = build_table(&config_path)?;

    let filter = make_filter(sale_only, locations, brands);
    let rows = filter_rows(&table.rows, &filter);

    match output_file {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .map_err(|e| CliError::runtime(format!("cannot create {}: {e}", path.display())))?;
            write_display_csv(&rows, file).map_err(|e| CliError::runtime(e.to_string()))?;
            eprintln!("wrote {} row(s) to {}", rows.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_display_csv(&rows, stdout.lock())
                .map_err(|e| CliError::runtime(e.to_string()))?;
        }
    }

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;

    match StockConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' with 1 warehouse, {} store(s), brand '{}'",
                config.name,
                config.stores.len(),
                config.brand,
            );
            Ok(())
        }
        Err(e) => Err(CliError::config(e.to_string())),
    }
}
