//! Prediction Route

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::debug;

use crate::pipeline::{run_pipeline, PredictRequest, PredictResponse};
use crate::AppState;

/// Run one prediction.
///
/// Degraded resources never fail this endpoint; the response's `source`,
/// `explanation.kind` and `notes` carry what actually happened.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    debug!(
        chromosome = %request.chromosome,
        position = %request.position,
        "prediction requested"
    );
    Json(run_pipeline(&state, &request))
}
