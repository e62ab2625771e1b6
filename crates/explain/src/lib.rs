//! Explanation Engine
//!
//! Produces per-feature attributions for a single prediction, degrading
//! through a fixed chain: tree-path local attribution, then the model's
//! stored global importances, then nothing. Never fails a request.

mod attribution;

pub use attribution::{attribute, Attribution};

use feature_engine::{FeatureName, FeatureVector};
use inference_engine::ClassifierState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors during local attribution. These never leave this crate's
/// public entry point; they select the next fallback tier.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("cover statistics missing or non-positive at tree {tree} node {node}")]
    MissingCover { tree: usize, node: usize },
    #[error("ensemble not usable for attribution: {0}")]
    Unusable(String),
}

/// One feature's share of an explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Feature this value belongs to
    pub feature: FeatureName,
    /// Signed contribution (local) or non-negative weight (global)
    pub value: f64,
}

/// Explanation outcome for a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Explanation {
    /// Tree-path local attribution for this exact feature vector
    Local {
        /// Expected margin before any feature is considered
        bias: f64,
        /// Per-feature signed contributions, vocabulary order
        contributions: Vec<FeatureContribution>,
    },
    /// The model's static global feature importances. An approximation,
    /// not a local explanation; downstream labels it as such.
    GlobalImportance {
        /// Per-feature weights, vocabulary order
        importances: Vec<FeatureContribution>,
    },
    /// No explanation could be produced
    Unavailable,
}

/// Explain a prediction, best-effort.
///
/// Absent classifier, attribution failure and missing importances all
/// degrade silently; the request itself never fails here.
pub fn explain(classifier: &ClassifierState, features: &FeatureVector) -> Explanation {
    let Some(ensemble) = classifier.ensemble() else {
        debug!("no classifier loaded, skipping explanation");
        return Explanation::Unavailable;
    };

    match attribute(ensemble, features) {
        Ok(attribution) => Explanation::Local {
            bias: attribution.bias,
            contributions: pair_up(&attribution.contributions),
        },
        Err(e) => {
            debug!("local attribution unavailable ({e}), trying stored importances");
            match &ensemble.feature_importances {
                Some(importances) => Explanation::GlobalImportance {
                    importances: pair_up(importances),
                },
                None => Explanation::Unavailable,
            }
        }
    }
}

fn pair_up(values: &[f64]) -> Vec<FeatureContribution> {
    FeatureName::ALL
        .iter()
        .zip(values)
        .map(|(feature, value)| FeatureContribution {
            feature: *feature,
            value: *value,
        })
        .collect()
}
