//! Variant Query Normalization

use data_validator::{normalize_allele, normalize_chromosome, parse_position};
use tracing::debug;

/// Normalized variant coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantQuery {
    /// Chromosome, `chr` prefix stripped
    pub chromosome: String,
    /// 1-based genomic position
    pub position: i64,
    /// Reference allele, trimmed
    pub reference: String,
    /// Alternate allele, trimmed
    pub alternate: String,
}

impl VariantQuery {
    /// Build a query from raw form fields.
    ///
    /// Returns `None` when the position does not parse; callers treat
    /// that as "no match", not as an error.
    pub fn parse(chromosome: &str, position: &str, reference: &str, alternate: &str) -> Option<Self> {
        let position = match parse_position(position) {
            Ok(p) => p,
            Err(e) => {
                debug!("skipping lookup: {e}");
                return None;
            }
        };
        Some(Self {
            chromosome: normalize_chromosome(chromosome),
            position,
            reference: normalize_allele(reference),
            alternate: normalize_allele(alternate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_fields() {
        let q = VariantQuery::parse("chr1", "1,234", " A ", "G").unwrap();
        assert_eq!(q.chromosome, "1");
        assert_eq!(q.position, 1234);
        assert_eq!(q.reference, "A");
        assert_eq!(q.alternate, "G");
    }

    #[test]
    fn test_prefixed_and_bare_chromosome_equal() {
        let a = VariantQuery::parse("chr1", "100", "A", "G").unwrap();
        let b = VariantQuery::parse("1", "100", "A", "G").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_position_is_absence() {
        assert!(VariantQuery::parse("1", "not-a-number", "A", "G").is_none());
    }
}
