//! Classifier Inference Engine
//!
//! Loads the serialized gradient-boosted tree ensemble and produces
//! pathogenic/benign predictions, delegating to the rule-based heuristic
//! whenever no usable model is available.

mod engine;
mod model;

pub use engine::{ClassifierState, Label, Prediction, PredictionEngine, PredictionSource};
pub use model::{Tree, TreeEnsemble, TreeNode};

use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    #[error("Model artifact invalid: {0}")]
    InvalidArtifact(String),
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}
