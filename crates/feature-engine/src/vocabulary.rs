//! Feature Vocabulary
//!
//! The ordered feature names are an external contract: the lookup CSV
//! columns and the model artifact's `feature_names` both use them.

use serde::{Deserialize, Serialize};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 6;

/// The six classifier input features, in model order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    /// Raw BLOSUM62 substitution score
    Blosum62Raw,
    /// Hydropathy difference between reference and alternate residue
    HydropathyDiff,
    /// Stop-gain flag (0/1)
    IsStop,
    /// Grantham distance
    Grantham,
    /// Allele frequency (missing filled with 0)
    AfFilled,
    /// log10 of allele frequency, derived
    LogAf,
}

impl FeatureName {
    /// All features in vector order
    pub const ALL: [FeatureName; FEATURE_DIMENSION] = [
        FeatureName::Blosum62Raw,
        FeatureName::HydropathyDiff,
        FeatureName::IsStop,
        FeatureName::Grantham,
        FeatureName::AfFilled,
        FeatureName::LogAf,
    ];

    /// Column/wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Blosum62Raw => "blosum62_raw",
            FeatureName::HydropathyDiff => "hydropathy_diff",
            FeatureName::IsStop => "is_stop",
            FeatureName::Grantham => "grantham",
            FeatureName::AfFilled => "af_filled",
            FeatureName::LogAf => "log_af",
        }
    }

    /// Position in the feature vector
    pub fn index(self) -> usize {
        match self {
            FeatureName::Blosum62Raw => 0,
            FeatureName::HydropathyDiff => 1,
            FeatureName::IsStop => 2,
            FeatureName::Grantham => 3,
            FeatureName::AfFilled => 4,
            FeatureName::LogAf => 5,
        }
    }

    /// Reverse of [`FeatureName::as_str`], for CSV/model headers
    pub fn from_column(name: &str) -> Option<FeatureName> {
        FeatureName::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}
