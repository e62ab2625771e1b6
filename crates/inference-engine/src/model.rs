//! Tree Ensemble Artifact
//!
//! The classifier is a JSON-serialized gradient-boosted tree ensemble.
//! Leaf values are raw margins: one group gets a sigmoid, several groups
//! get a softmax with group 1 holding the pathogenic class.

use crate::InferenceError;
use feature_engine::{FeatureName, FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Single node of a decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Split feature index; -1 marks a leaf
    pub feature: i32,
    /// Split threshold (`x[feature] < threshold` routes left)
    #[serde(default)]
    pub threshold: f64,
    /// Left child index
    #[serde(default)]
    pub left: usize,
    /// Right child index
    #[serde(default)]
    pub right: usize,
    /// Leaf weight (raw margin contribution)
    #[serde(default)]
    pub value: f64,
    /// Training cover (sum of instance weights reaching this node)
    #[serde(default)]
    pub cover: f64,
}

impl TreeNode {
    /// True when this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.feature < 0
    }
}

/// Decision tree, nodes stored in topological order (children after
/// parents), root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Output group this tree contributes to
    #[serde(default)]
    pub group: usize,
    /// Node storage
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Route a feature row to its leaf value
    pub fn route(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            idx = if row[node.feature as usize] < node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }
}

/// Serialized gradient-boosted tree ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Feature names in input order; must match the fixed vocabulary
    pub feature_names: Vec<String>,
    /// Number of output groups (1 for binary log-odds)
    #[serde(default = "default_num_groups")]
    pub num_groups: usize,
    /// Margin added to every group before the link function
    #[serde(default)]
    pub base_score: f64,
    /// The boosted trees
    pub trees: Vec<Tree>,
    /// Optional global feature importances, vocabulary order
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

fn default_num_groups() -> usize {
    1
}

impl TreeEnsemble {
    /// Load and validate an ensemble from a JSON artifact
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let file = std::fs::File::open(path)
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {e}", path.display())))?;
        let ensemble: TreeEnsemble = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {e}", path.display())))?;
        ensemble.validate()?;
        debug!(
            trees = ensemble.trees.len(),
            groups = ensemble.num_groups,
            "loaded tree ensemble"
        );
        Ok(ensemble)
    }

    /// Structural validation: vocabulary match, in-bounds indices, and
    /// strictly forward child links (rules out cycles).
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.feature_names.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidArtifact(format!(
                "expected {} feature names, got {}",
                FEATURE_DIMENSION,
                self.feature_names.len()
            )));
        }
        for (name, expected) in self.feature_names.iter().zip(FeatureName::ALL) {
            if name != expected.as_str() {
                return Err(InferenceError::InvalidArtifact(format!(
                    "feature name '{name}' does not match vocabulary entry '{}'",
                    expected.as_str()
                )));
            }
        }
        if self.num_groups == 0 {
            return Err(InferenceError::InvalidArtifact("num_groups is zero".into()));
        }
        if let Some(fi) = &self.feature_importances {
            if fi.len() != FEATURE_DIMENSION {
                return Err(InferenceError::InvalidArtifact(format!(
                    "feature_importances has length {}, expected {}",
                    fi.len(),
                    FEATURE_DIMENSION
                )));
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.group >= self.num_groups {
                return Err(InferenceError::InvalidArtifact(format!(
                    "tree {t} targets group {} of {}",
                    tree.group, self.num_groups
                )));
            }
            if tree.nodes.is_empty() {
                return Err(InferenceError::InvalidArtifact(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if node.is_leaf() {
                    continue;
                }
                if node.feature as usize >= FEATURE_DIMENSION {
                    return Err(InferenceError::InvalidArtifact(format!(
                        "tree {t} node {i} splits on feature {}",
                        node.feature
                    )));
                }
                if node.left >= tree.nodes.len()
                    || node.right >= tree.nodes.len()
                    || node.left <= i
                    || node.right <= i
                {
                    return Err(InferenceError::InvalidArtifact(format!(
                        "tree {t} node {i} has invalid children ({}, {})",
                        node.left, node.right
                    )));
                }
            }
        }
        Ok(())
    }

    /// Index of the group holding the pathogenic class
    pub fn positive_group(&self) -> usize {
        if self.num_groups > 1 {
            1
        } else {
            0
        }
    }

    /// Raw per-group margins for a feature vector
    pub fn predict_margins(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let row = features.as_slice();
        if row.len() != self.feature_names.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.feature_names.len(),
                actual: row.len(),
            });
        }
        let mut margins = vec![self.base_score; self.num_groups];
        for tree in &self.trees {
            margins[tree.group] += tree.route(row);
        }
        Ok(margins)
    }

    /// Probability mass assigned to the pathogenic class
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let margins = self.predict_margins(features)?;
        if margins.len() == 1 {
            Ok(sigmoid(margins[0]))
        } else {
            Ok(softmax_mass(&margins, self.positive_group()))
        }
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

fn softmax_mass(margins: &[f64], group: usize) -> f64 {
    let max = margins.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp[group] / total
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_route_and_probability_bounds() {
        let ensemble = stop_gain_ensemble();
        let mut features = FeatureVector::default();
        let p_benign = ensemble.predict_proba(&features).unwrap();
        features.set(FeatureName::IsStop, 1.0);
        let p_path = ensemble.predict_proba(&features).unwrap();

        assert!((0.0..=1.0).contains(&p_benign));
        assert!((0.0..=1.0).contains(&p_path));
        assert!(p_path > 0.5);
        assert!(p_benign < 0.5);
    }

    #[test]
    fn test_base_score_shifts_margin() {
        let mut ensemble = stop_gain_ensemble();
        ensemble.base_score = 5.0;
        let p = ensemble.predict_proba(&FeatureVector::default()).unwrap();
        // margin = 5.0 - 2.0 = 3.0, sigmoid(3) ~ 0.953
        assert!((p - 1.0 / (1.0 + (-3.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_multigroup_softmax_positive_mass() {
        let mut path_tree = stump(FeatureName::IsStop, 0.5, -1.0, 3.0);
        path_tree.group = 1;
        let benign_tree = stump(FeatureName::IsStop, 0.5, 1.0, -1.0);
        let ensemble = TreeEnsemble {
            feature_names: vocabulary_names(),
            num_groups: 2,
            base_score: 0.0,
            trees: vec![benign_tree, path_tree],
            feature_importances: None,
        };
        ensemble.validate().unwrap();

        let mut features = FeatureVector::default();
        features.set(FeatureName::IsStop, 1.0);
        let p = ensemble.predict_proba(&features).unwrap();
        // margins: benign -1.0, pathogenic 3.0
        assert!(p > 0.9);
    }

    #[test]
    fn test_validation_rejects_wrong_vocabulary() {
        let mut ensemble = stop_gain_ensemble();
        ensemble.feature_names[0] = "wrong".into();
        assert!(matches!(
            ensemble.validate(),
            Err(InferenceError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_validation_rejects_backward_child_link() {
        let mut ensemble = stop_gain_ensemble();
        ensemble.trees[0].nodes[0].left = 0;
        assert!(ensemble.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_feature() {
        let mut ensemble = stop_gain_ensemble();
        ensemble.trees[0].nodes[0].feature = 12;
        assert!(ensemble.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let ensemble = stop_gain_ensemble();
        let json = serde_json::to_string(&ensemble).unwrap();
        let back: TreeEnsemble = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.trees.len(), 1);
        assert_eq!(back.num_groups, 1);
    }
}
