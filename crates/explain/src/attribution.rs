//! Tree-Path Attribution
//!
//! Local attribution by decision-path decomposition: walking a sample
//! down each tree, every split moves the expected margin from the
//! parent's cover-weighted expectation to the taken child's, and that
//! difference is credited to the split feature. Contributions plus bias
//! reconstruct the raw margin exactly.

use crate::ExplainError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use inference_engine::{Tree, TreeEnsemble};

/// Local attribution for one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    /// Expected margin over the training distribution (root expectation
    /// summed across trees, plus base score)
    pub bias: f64,
    /// Signed per-feature contributions, vocabulary order
    pub contributions: [f64; FEATURE_DIMENSION],
}

/// Attribute a single feature vector against the ensemble's
/// positive-class trees.
pub fn attribute(
    ensemble: &TreeEnsemble,
    features: &FeatureVector,
) -> Result<Attribution, ExplainError> {
    let row = features.as_slice();
    if row.len() != ensemble.feature_names.len() {
        return Err(ExplainError::Unusable(format!(
            "feature row has {} values, model expects {}",
            row.len(),
            ensemble.feature_names.len()
        )));
    }

    let group = ensemble.positive_group();
    let mut bias = ensemble.base_score;
    let mut contributions = [0.0; FEATURE_DIMENSION];

    for (t, tree) in ensemble.trees.iter().enumerate() {
        if tree.group != group {
            continue;
        }
        let expectations = subtree_expectations(t, tree)?;
        bias += expectations[0];

        let mut idx = 0;
        loop {
            let node = &tree.nodes[idx];
            if node.is_leaf() {
                break;
            }
            let next = if row[node.feature as usize] < node.threshold {
                node.left
            } else {
                node.right
            };
            contributions[node.feature as usize] += expectations[next] - expectations[idx];
            idx = next;
        }
    }

    Ok(Attribution { bias, contributions })
}

/// Cover-weighted expected leaf value of every subtree.
///
/// Relies on nodes being stored children-after-parents (enforced at
/// artifact load), so one reverse pass suffices.
fn subtree_expectations(tree_idx: usize, tree: &Tree) -> Result<Vec<f64>, ExplainError> {
    let mut expectations = vec![0.0; tree.nodes.len()];
    for (i, node) in tree.nodes.iter().enumerate().rev() {
        if node.is_leaf() {
            expectations[i] = node.value;
            continue;
        }
        if node.left <= i || node.right <= i || node.left >= tree.nodes.len() || node.right >= tree.nodes.len() {
            return Err(ExplainError::Unusable(format!(
                "tree {tree_idx} node {i} is not in topological order"
            )));
        }
        let left = &tree.nodes[node.left];
        let right = &tree.nodes[node.right];
        if left.cover <= 0.0 || right.cover <= 0.0 {
            return Err(ExplainError::MissingCover {
                tree: tree_idx,
                node: i,
            });
        }
        expectations[i] = (left.cover * expectations[node.left]
            + right.cover * expectations[node.right])
            / (left.cover + right.cover);
    }
    Ok(expectations)
}
