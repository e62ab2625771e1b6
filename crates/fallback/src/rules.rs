//! Heuristic Rules

use feature_engine::{FeatureName, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Probability proxy reported when a rule fires. Illustrative, not
/// calibrated.
pub const PROB_PATHOGENIC: f64 = 0.85;
/// Probability proxy reported when no rule fires
pub const PROB_BENIGN: f64 = 0.15;

/// BLOSUM62 score at or below which a substitution counts as severe
const BLOSUM62_SEVERE: f64 = -2.0;

/// Individual heuristic rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicRule {
    /// Variant introduces a stop codon
    StopGain,
    /// BLOSUM62 score indicates a severe substitution
    SevereSubstitution,
}

impl HeuristicRule {
    /// Human-readable rule description
    pub fn describe(&self) -> &'static str {
        match self {
            HeuristicRule::StopGain => "stop codon introduced (is_stop = 1)",
            HeuristicRule::SevereSubstitution => "BLOSUM62 score at or below -2.0",
        }
    }
}

/// Verdict from the heuristic engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicVerdict {
    /// Whether the variant is called pathogenic
    pub pathogenic: bool,
    /// Probability proxy (0.85 pathogenic, 0.15 benign)
    pub probability: f64,
    /// Rules that fired, in evaluation order
    pub triggered: Vec<HeuristicRule>,
}

/// Deterministic heuristic classifier substitute.
///
/// A variant is called pathogenic when it introduces a stop codon or its
/// BLOSUM62 score is at or below -2.0 (boundary inclusive).
#[derive(Debug, Default)]
pub struct HeuristicEngine;

impl HeuristicEngine {
    /// Create a heuristic engine
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the heuristic against a feature vector
    pub fn evaluate(&self, features: &FeatureVector) -> HeuristicVerdict {
        let mut triggered = Vec::new();

        if features.get(FeatureName::IsStop) == 1.0 {
            triggered.push(HeuristicRule::StopGain);
        }
        if features.get(FeatureName::Blosum62Raw) <= BLOSUM62_SEVERE {
            triggered.push(HeuristicRule::SevereSubstitution);
        }

        let pathogenic = !triggered.is_empty();
        let probability = if pathogenic { PROB_PATHOGENIC } else { PROB_BENIGN };
        debug!(pathogenic, ?triggered, "heuristic verdict");

        HeuristicVerdict {
            pathogenic,
            probability,
            triggered,
        }
    }
}
