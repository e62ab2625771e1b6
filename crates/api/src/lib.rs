//! Variant Predictor API Server
//!
//! JSON API over the prediction pipeline: collects raw variant
//! coordinates and manual features, runs the lookup/resolve/predict/
//! explain chain, and reports component health.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod pipeline;
mod routes;

pub use config::AppConfig;
pub use pipeline::{run_pipeline, FeatureValue, PredictRequest, PredictResponse};

use inference_engine::PredictionEngine;
use variant_lookup::TableState;

/// Application state: resources loaded once at startup and shared
/// read-only across requests. No locking; nothing here mutates.
pub struct AppState {
    /// Lookup table state
    pub table: TableState,
    /// Prediction engine wrapping the classifier state
    pub engine: PredictionEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Load all resources per the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::for_resources(
            TableState::load(&config.table_path, config.table_row_cap),
            PredictionEngine::from_artifact(&config.model_path),
        )
    }

    /// Build state over already-resolved resources
    pub fn for_resources(table: TableState, engine: PredictionEngine) -> Self {
        Self {
            table,
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Per-component resource status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub classifier: ComponentHealth,
    pub lookup_table: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predict::predict_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            classifier: ComponentHealth {
                status: state.engine.classifier().status().to_string(),
                rows: None,
            },
            lookup_table: ComponentHealth {
                status: state.table.status().to_string(),
                rows: state.table.row_count(),
            },
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state);

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_engine::ClassifierState;

    #[tokio::test]
    async fn test_health_reports_degraded_components() {
        let state = Arc::new(AppState::for_resources(
            TableState::Missing,
            PredictionEngine::new(ClassifierState::Missing),
        ));
        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[test]
    fn test_health_component_fields() {
        let state = AppState::for_resources(
            TableState::Failed("missing column".into()),
            PredictionEngine::new(ClassifierState::Missing),
        );
        assert_eq!(state.table.status(), "failed");
        assert_eq!(state.engine.classifier().status(), "missing");
        assert_eq!(state.table.row_count(), None);
    }
}
