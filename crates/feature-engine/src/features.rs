//! Feature Vector Assembly

use crate::vocabulary::{FeatureName, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};

/// Feature vector for classifier inference
///
/// Always carries all six features in vocabulary order. Built fresh per
/// request by the resolver and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    /// Value of a single feature
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// Set a single feature
    pub fn set(&mut self, name: FeatureName, value: f64) {
        self.values[name.index()] = value;
    }

    /// Values in vocabulary order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// (name, value) pairs in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// True when every value is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Feature values carried by a lookup table row.
///
/// A row may supply any subset of the vocabulary; absent or malformed
/// cells stay `None` and default to 0.0 at resolution time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupFeatures {
    values: [Option<f64>; FEATURE_DIMENSION],
}

impl LookupFeatures {
    /// Value for a feature, if the row carried one
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        self.values[name.index()]
    }

    /// Record a value parsed from the row
    pub fn set(&mut self, name: FeatureName, value: f64) {
        self.values[name.index()] = Some(value);
    }

    /// True when the row carried no feature values at all
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_all_zero() {
        let v = FeatureVector::default();
        for name in FeatureName::ALL {
            assert_eq!(v.get(name), 0.0);
        }
        assert!(v.is_finite());
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut v = FeatureVector::default();
        v.set(FeatureName::Grantham, 50.0);
        assert_eq!(v.get(FeatureName::Grantham), 50.0);
        assert_eq!(v.as_slice()[FeatureName::Grantham.index()], 50.0);
    }

    #[test]
    fn test_lookup_features_subset() {
        let mut row = LookupFeatures::default();
        assert!(row.is_empty());
        row.set(FeatureName::Blosum62Raw, -3.0);
        assert_eq!(row.get(FeatureName::Blosum62Raw), Some(-3.0));
        assert_eq!(row.get(FeatureName::Grantham), None);
        assert!(!row.is_empty());
    }
}
