//! Request Pipeline
//!
//! The synchronous core of every prediction request: lookup, resolve,
//! predict, explain. Kept free of HTTP concerns so the whole flow is
//! testable without a server.

use crate::AppState;
use explain::{explain, Explanation};
use feature_engine::{resolve, FeatureName, FeatureVector, ManualInputs};
use inference_engine::{Label, Prediction, PredictionSource};
use serde::{Deserialize, Serialize};
use tracing::debug;
use variant_lookup::VariantQuery;

/// Prediction request, mirroring the entry form: coordinates as free
/// text, manual features with form defaults when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Chromosome, with or without `chr` prefix
    pub chromosome: String,
    /// Position, thousands separators tolerated
    pub position: String,
    /// Reference allele
    pub reference: String,
    /// Alternate allele
    pub alternate: String,
    /// Manual biochemical features
    #[serde(flatten)]
    pub manual: ManualInputs,
}

/// One resolved feature value, echoed back in vocabulary order
#[derive(Debug, Clone, Serialize)]
pub struct FeatureValue {
    pub feature: FeatureName,
    pub value: f64,
}

/// Full prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Class label
    pub label: Label,
    /// Pathogenic-class probability
    pub probability: f64,
    /// Model or heuristic
    pub source: PredictionSource,
    /// Whether the variant was found in the lookup table
    pub matched: bool,
    /// The exact inputs handed to the classifier
    pub features: Vec<FeatureValue>,
    /// Best-effort explanation
    pub explanation: Explanation,
    /// Human-readable caveats and info lines
    pub notes: Vec<String>,
}

/// Run the full prediction pipeline for one request.
///
/// Every failure mode inside has a degraded continuation; this function
/// always produces a response.
pub fn run_pipeline(state: &AppState, request: &PredictRequest) -> PredictResponse {
    let query = VariantQuery::parse(
        &request.chromosome,
        &request.position,
        &request.reference,
        &request.alternate,
    );
    let row = query
        .as_ref()
        .and_then(|q| state.table.table().and_then(|t| t.find(q)));
    let matched = row.is_some();
    debug!(matched, "variant lookup done");

    let features = resolve(row.map(|r| &r.features), &request.manual);
    let prediction = state.engine.predict(&features);
    let explanation = explain(state.engine.classifier(), &features);

    let notes = build_notes(matched, &prediction, &explanation);
    PredictResponse {
        label: prediction.label,
        probability: prediction.probability,
        source: prediction.source,
        matched,
        features: echo_features(&features),
        explanation,
        notes,
    }
}

fn echo_features(features: &FeatureVector) -> Vec<FeatureValue> {
    features
        .iter()
        .map(|(feature, value)| FeatureValue { feature, value })
        .collect()
}

fn build_notes(matched: bool, prediction: &Prediction, explanation: &Explanation) -> Vec<String> {
    let mut notes = Vec::new();
    if matched {
        notes.push("variant found in local feature table".to_string());
    }
    if prediction.source == PredictionSource::Heuristic {
        notes.push("no usable classifier; heuristic rules applied".to_string());
        for rule in &prediction.triggered_rules {
            notes.push(format!("rule fired: {}", rule.describe()));
        }
    }
    if matches!(explanation, Explanation::GlobalImportance { .. }) {
        notes.push(
            "local attribution unavailable; showing global feature importance (approximation)"
                .to_string(),
        );
    }
    notes
}
