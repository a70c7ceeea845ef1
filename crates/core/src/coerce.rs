//! Tolerant numeric coercion for externally maintained spreadsheets.
//!
//! Source files arrive with thousands separators, stray quotes, and
//! trailing percent signs. Every coercion degrades to a fallback instead
//! of failing the row.

/// Parse a loosely formatted numeric string. Strips surrounding
/// whitespace and quotes, thousands separators, and a trailing `%`.
/// Returns `None` when nothing parseable remains.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    s = s.trim_matches('"').trim_matches('\'').trim();
    s = s.strip_suffix('%').unwrap_or(s).trim_end();

    if s.is_empty() {
        return None;
    }

    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coercion for price-like fields: unparsable or negative values
/// become 0.
pub fn coerce_or_zero(raw: &str) -> f64 {
    match coerce_number(raw) {
        Some(n) if n > 0.0 => n,
        _ => 0.0,
    }
}

/// Coercion for quantity fields: unparsable or negative values become 0,
/// fractional counts truncate.
pub fn coerce_quantity(raw: &str) -> i64 {
    match coerce_number(raw) {
        Some(n) if n > 0.0 => n as i64,
        _ => 0,
    }
}
