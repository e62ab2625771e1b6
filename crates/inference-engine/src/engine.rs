//! Prediction Engine Implementation

use crate::model::TreeEnsemble;
use fallback::{HeuristicEngine, HeuristicRule};
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Binary classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Pathogenic,
    Benign,
}

impl Label {
    /// Apply the 0.5 threshold; ties go to pathogenic
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.5 {
            Label::Pathogenic
        } else {
            Label::Benign
        }
    }

    /// String representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Pathogenic => "pathogenic",
            Label::Benign => "benign",
        }
    }
}

/// Which path produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Trained classifier
    Model,
    /// Rule-based heuristic
    Heuristic,
}

/// Prediction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Class label
    pub label: Label,
    /// Probability of the pathogenic class, in [0, 1]
    pub probability: f64,
    /// Whether the model or the heuristic produced this result
    pub source: PredictionSource,
    /// Heuristic rules that fired (empty for model predictions)
    pub triggered_rules: Vec<HeuristicRule>,
}

/// Classifier artifact state.
///
/// Loading never aborts startup; missing or broken artifacts select the
/// heuristic path and are reported through the health surface.
#[derive(Debug)]
pub enum ClassifierState {
    /// Artifact loaded and validated
    Loaded(TreeEnsemble),
    /// No artifact at the configured path
    Missing,
    /// Artifact present but unreadable or structurally invalid
    Failed(String),
}

impl ClassifierState {
    /// Load the classifier artifact from disk
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("no classifier artifact at {}, using heuristic fallback", path.display());
            return ClassifierState::Missing;
        }
        match TreeEnsemble::from_path(path) {
            Ok(ensemble) => {
                info!(
                    trees = ensemble.trees.len(),
                    "classifier loaded from {}",
                    path.display()
                );
                ClassifierState::Loaded(ensemble)
            }
            Err(e) => {
                warn!("classifier artifact rejected: {e}");
                ClassifierState::Failed(e.to_string())
            }
        }
    }

    /// The loaded ensemble, if any
    pub fn ensemble(&self) -> Option<&TreeEnsemble> {
        match self {
            ClassifierState::Loaded(ensemble) => Some(ensemble),
            _ => None,
        }
    }

    /// Status string for the health surface
    pub fn status(&self) -> &'static str {
        match self {
            ClassifierState::Loaded(_) => "loaded",
            ClassifierState::Missing => "missing",
            ClassifierState::Failed(_) => "failed",
        }
    }
}

/// Prediction engine wrapping the classifier state and its heuristic
/// substitute
pub struct PredictionEngine {
    classifier: ClassifierState,
    heuristic: HeuristicEngine,
}

impl PredictionEngine {
    /// Create an engine over an already-resolved classifier state
    pub fn new(classifier: ClassifierState) -> Self {
        Self {
            classifier,
            heuristic: HeuristicEngine::new(),
        }
    }

    /// Create an engine by loading the artifact at `path`
    pub fn from_artifact(path: &Path) -> Self {
        Self::new(ClassifierState::load(path))
    }

    /// Classifier state, for health reporting and explanation
    pub fn classifier(&self) -> &ClassifierState {
        &self.classifier
    }

    /// Predict pathogenicity for a resolved feature vector.
    ///
    /// A loaded model that errors at invocation time degrades to the
    /// heuristic, the same as a missing artifact.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        if let ClassifierState::Loaded(ensemble) = &self.classifier {
            match ensemble.predict_proba(features) {
                Ok(probability) => {
                    return Prediction {
                        label: Label::from_probability(probability),
                        probability,
                        source: PredictionSource::Model,
                        triggered_rules: Vec::new(),
                    }
                }
                Err(e) => {
                    warn!("classifier invocation failed ({e}), falling back to heuristic");
                }
            }
        }

        let verdict = self.heuristic.evaluate(features);
        Prediction {
            label: if verdict.pathogenic {
                Label::Pathogenic
            } else {
                Label::Benign
            },
            probability: verdict.probability,
            source: PredictionSource::Heuristic,
            triggered_rules: verdict.triggered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{stop_gain_ensemble, stump, vocabulary_names};
    use fallback::{PROB_BENIGN, PROB_PATHOGENIC};
    use feature_engine::FeatureName;
    use std::io::Write;

    #[test]
    fn test_label_threshold_ties_to_pathogenic() {
        assert_eq!(Label::from_probability(0.5), Label::Pathogenic);
        assert_eq!(Label::from_probability(0.49999), Label::Benign);
        assert_eq!(Label::from_probability(1.0), Label::Pathogenic);
        assert_eq!(Label::from_probability(0.0), Label::Benign);
    }

    #[test]
    fn test_model_probability_exactly_half_is_pathogenic() {
        // A single zero-weight leaf yields margin 0 -> sigmoid 0.5.
        let ensemble = TreeEnsemble {
            feature_names: vocabulary_names(),
            num_groups: 1,
            base_score: 0.0,
            trees: vec![stump(FeatureName::IsStop, 0.5, 0.0, 0.0)],
            feature_importances: None,
        };
        let engine = PredictionEngine::new(ClassifierState::Loaded(ensemble));
        let prediction = engine.predict(&FeatureVector::default());
        assert_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.label, Label::Pathogenic);
        assert_eq!(prediction.source, PredictionSource::Model);
    }

    #[test]
    fn test_missing_classifier_uses_heuristic() {
        let engine = PredictionEngine::new(ClassifierState::Missing);
        let prediction = engine.predict(&FeatureVector::default());
        assert_eq!(prediction.source, PredictionSource::Heuristic);
        assert_eq!(prediction.probability, PROB_BENIGN);
        assert_eq!(prediction.label, Label::Benign);
    }

    #[test]
    fn test_invocation_failure_falls_back() {
        // Bypass load validation to get a loaded-but-broken model.
        let mut ensemble = stop_gain_ensemble();
        ensemble.feature_names.pop();
        let engine = PredictionEngine::new(ClassifierState::Loaded(ensemble));

        let mut features = FeatureVector::default();
        features.set(FeatureName::IsStop, 1.0);
        let prediction = engine.predict(&features);
        assert_eq!(prediction.source, PredictionSource::Heuristic);
        assert_eq!(prediction.probability, PROB_PATHOGENIC);
        assert_eq!(prediction.label, Label::Pathogenic);
    }

    #[test]
    fn test_state_load_missing_path() {
        let state = ClassifierState::load(Path::new("/nonexistent/model.json"));
        assert!(matches!(state, ClassifierState::Missing));
        assert_eq!(state.status(), "missing");
    }

    #[test]
    fn test_state_load_invalid_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let state = ClassifierState::load(file.path());
        assert!(matches!(state, ClassifierState::Failed(_)));
        assert_eq!(state.status(), "failed");
    }

    #[test]
    fn test_state_load_valid_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&stop_gain_ensemble()).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let state = ClassifierState::load(file.path());
        assert!(matches!(state, ClassifierState::Loaded(_)));

        let engine = PredictionEngine::new(state);
        let mut features = FeatureVector::default();
        features.set(FeatureName::IsStop, 1.0);
        let prediction = engine.predict(&features);
        assert_eq!(prediction.source, PredictionSource::Model);
        assert!(prediction.probability > 0.5);
    }
}
