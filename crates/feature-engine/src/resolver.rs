//! Feature Resolution
//!
//! Merges lookup-table values with manual overrides and computes the
//! derived log allele frequency.

use crate::features::{FeatureVector, LookupFeatures};
use crate::vocabulary::FeatureName;
use data_validator::{coerce_flag, sanitize};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Epsilon added before the log transform so AF = 0 stays finite
pub const AF_EPSILON: f64 = 1e-12;

/// Manually entered biochemical features.
///
/// Defaults mirror the entry form: they are always present, so manual
/// values overwrite lookup values for every non-derived feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualInputs {
    /// Raw BLOSUM62 score
    #[serde(default = "default_blosum62")]
    pub blosum62_raw: f64,
    /// Hydropathy difference
    #[serde(default)]
    pub hydropathy_diff: f64,
    /// Stop-gain flag, 0 or 1
    #[serde(default)]
    pub is_stop: f64,
    /// Grantham distance
    #[serde(default = "default_grantham")]
    pub grantham: f64,
    /// Allele frequency, non-negative
    #[serde(default)]
    pub allele_frequency: f64,
}

fn default_blosum62() -> f64 {
    -1.0
}

fn default_grantham() -> f64 {
    50.0
}

impl Default for ManualInputs {
    fn default() -> Self {
        Self {
            blosum62_raw: default_blosum62(),
            hydropathy_diff: 0.0,
            is_stop: 0.0,
            grantham: default_grantham(),
            allele_frequency: 0.0,
        }
    }
}

/// Resolve a feature vector from an optional lookup row and the manual
/// inputs.
///
/// Precedence: lookup values seed the vector (absent defaults to 0.0),
/// then the five non-derived features are unconditionally overwritten by the
/// manual inputs, then `log_af` is derived from the resolved allele
/// frequency. The result is finite for any input.
pub fn resolve(row: Option<&LookupFeatures>, manual: &ManualInputs) -> FeatureVector {
    let mut features = FeatureVector::default();

    if let Some(row) = row {
        for name in FeatureName::ALL {
            if let Some(value) = row.get(name) {
                features.set(name, value);
            }
        }
        debug!("seeded features from lookup row");
    }

    features.set(FeatureName::Blosum62Raw, sanitize(manual.blosum62_raw));
    features.set(FeatureName::HydropathyDiff, sanitize(manual.hydropathy_diff));
    features.set(FeatureName::IsStop, coerce_flag(manual.is_stop));
    features.set(FeatureName::Grantham, sanitize(manual.grantham));
    // AF is clamped to >= 0 so the derived log stays finite.
    let af = sanitize(manual.allele_frequency).max(0.0);
    features.set(FeatureName::AfFilled, af);
    features.set(FeatureName::LogAf, (af + AF_EPSILON).log10());

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_row() -> LookupFeatures {
        let mut row = LookupFeatures::default();
        for name in FeatureName::ALL {
            row.set(name, 99.0);
        }
        row
    }

    #[test]
    fn test_no_row_uses_manual_values() {
        let manual = ManualInputs::default();
        let features = resolve(None, &manual);
        assert_eq!(features.get(FeatureName::Blosum62Raw), -1.0);
        assert_eq!(features.get(FeatureName::HydropathyDiff), 0.0);
        assert_eq!(features.get(FeatureName::IsStop), 0.0);
        assert_eq!(features.get(FeatureName::Grantham), 50.0);
        assert_eq!(features.get(FeatureName::AfFilled), 0.0);
    }

    #[test]
    fn test_manual_overrides_lookup() {
        let manual = ManualInputs {
            blosum62_raw: -4.0,
            hydropathy_diff: 1.5,
            is_stop: 1.0,
            grantham: 120.0,
            allele_frequency: 0.25,
        };
        let features = resolve(Some(&full_row()), &manual);
        assert_eq!(features.get(FeatureName::Blosum62Raw), -4.0);
        assert_eq!(features.get(FeatureName::HydropathyDiff), 1.5);
        assert_eq!(features.get(FeatureName::IsStop), 1.0);
        assert_eq!(features.get(FeatureName::Grantham), 120.0);
        assert_eq!(features.get(FeatureName::AfFilled), 0.25);
    }

    #[test]
    fn test_log_af_derived_not_looked_up() {
        // The row claims log_af = 99; the resolver must recompute it.
        let manual = ManualInputs {
            allele_frequency: 0.01,
            ..ManualInputs::default()
        };
        let features = resolve(Some(&full_row()), &manual);
        let expected = (0.01f64 + AF_EPSILON).log10();
        assert!((features.get(FeatureName::LogAf) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_log_af_finite_at_zero_frequency() {
        let features = resolve(None, &ManualInputs::default());
        assert!((features.get(FeatureName::LogAf) - (-12.0)).abs() < 1e-9);
        assert!(features.is_finite());
    }

    #[test]
    fn test_non_finite_manual_coerced() {
        let manual = ManualInputs {
            blosum62_raw: f64::NAN,
            hydropathy_diff: f64::INFINITY,
            is_stop: f64::NAN,
            grantham: f64::NEG_INFINITY,
            allele_frequency: f64::NAN,
        };
        let features = resolve(None, &manual);
        assert!(features.is_finite());
        assert_eq!(features.get(FeatureName::Blosum62Raw), 0.0);
        assert_eq!(features.get(FeatureName::IsStop), 0.0);
    }

    #[test]
    fn test_negative_af_clamped() {
        let manual = ManualInputs {
            allele_frequency: -0.5,
            ..ManualInputs::default()
        };
        let features = resolve(None, &manual);
        assert_eq!(features.get(FeatureName::AfFilled), 0.0);
        assert!(features.is_finite());
    }

    proptest! {
        #[test]
        fn prop_resolved_vector_finite(
            blosum in proptest::num::f64::ANY,
            hydro in proptest::num::f64::ANY,
            stop in proptest::num::f64::ANY,
            grantham in proptest::num::f64::ANY,
            af in proptest::num::f64::ANY,
        ) {
            let manual = ManualInputs {
                blosum62_raw: blosum,
                hydropathy_diff: hydro,
                is_stop: stop,
                grantham,
                allele_frequency: af,
            };
            prop_assert!(resolve(None, &manual).is_finite());
        }

        #[test]
        fn prop_log_af_monotonic(af_a in 0.0f64..1.0, af_b in 0.0f64..1.0) {
            let (lo, hi) = if af_a <= af_b { (af_a, af_b) } else { (af_b, af_a) };
            let f_lo = resolve(None, &ManualInputs { allele_frequency: lo, ..ManualInputs::default() });
            let f_hi = resolve(None, &ManualInputs { allele_frequency: hi, ..ManualInputs::default() });
            prop_assert!(f_lo.get(FeatureName::LogAf) <= f_hi.get(FeatureName::LogAf));
        }
    }
}
