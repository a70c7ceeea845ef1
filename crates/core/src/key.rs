//! Design-number extraction.
//!
//! Two sources encode the canonical product key differently: the
//! warehouse master and the sale catalog carry a structured code field
//! (`" LN 197 "`), while store extracts embed the code in a free-text
//! item name (`"Ln120 - Polo White 2xl"`). Each encoding gets a named
//! strategy; both normalize to uppercase with no internal whitespace.

use std::sync::OnceLock;

use regex::Regex;

/// Which extraction strategy a source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Structured code field: trim, uppercase, drop internal spaces.
    Direct,
    /// Free-text field: first run of two letters followed by digits.
    Embedded,
}

pub fn extract(strategy: KeyStrategy, raw: &str) -> Option<String> {
    match strategy {
        KeyStrategy::Direct => extract_direct(raw),
        KeyStrategy::Embedded => extract_embedded(raw),
    }
}

/// Canonicalize a structured code field. `" LN 197 "` becomes `"LN197"`.
/// Returns `None` when the field is blank.
pub fn extract_direct(raw: &str) -> Option<String> {
    let key: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

fn embedded_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[A-Z]{2}[0-9]+").expect("static pattern"))
}

/// Scan free text for an embedded design number: two letters followed by
/// one or more digits, case-insensitive. First match wins; rows whose
/// text contains no match are dropped by the loaders.
pub fn extract_embedded(raw: &str) -> Option<String> {
    embedded_pattern()
        .find(raw)
        .map(|m| m.as_str().to_uppercase())
}
