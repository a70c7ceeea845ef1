use std::fmt;

#[derive(Debug)]
pub enum StockError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no stores, duplicate location, etc.).
    ConfigValidation(String),
    /// A source referenced by name does not exist in the config.
    UnknownSource(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// IO error (file read, etc.). Covers missing source files — a run
    /// with an unreadable source fails outright rather than producing a
    /// partial table.
    Io(String),
}

impl fmt::Display for StockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownSource(name) => write!(f, "unknown source: {name}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for StockError {}
