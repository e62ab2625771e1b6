//! Variant Coordinate Normalization

use crate::error::InputError;

/// Normalize a chromosome string for comparison.
///
/// Trims whitespace and strips one leading `chr` prefix (any case), so
/// `"chr1"`, `" Chr1 "` and `"1"` all compare equal.
pub fn normalize_chromosome(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &trimmed[3..],
        _ => trimmed,
    };
    stripped.trim().to_string()
}

/// Parse a genomic position, ignoring thousands separators.
///
/// `"1,234,567"` parses as 1234567. Failure is an error value the caller
/// maps to "skip lookup"; it never fails a request.
pub fn parse_position(raw: &str) -> Result<i64, InputError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<i64>()
        .map_err(|_| InputError::InvalidPosition(raw.to_string()))
}

/// Normalize a REF/ALT allele string: trimmed, compared as-is otherwise.
pub fn normalize_allele(raw: &str) -> String {
    raw.trim().to_string()
}
