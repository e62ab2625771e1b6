//! Feature Engineering Engine
//!
//! Owns the fixed six-feature vocabulary shared by the lookup table, the
//! classifier and the explainer, and resolves lookup rows plus manual
//! overrides into the feature vector handed to inference.

mod features;
mod resolver;
mod vocabulary;

pub use features::{FeatureVector, LookupFeatures};
pub use resolver::{resolve, ManualInputs, AF_EPSILON};
pub use vocabulary::{FeatureName, FEATURE_DIMENSION};
