//! Axum routes for the prediction service

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::types::{HealthResponse, ModelInfoResponse, PredictionResponse};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use mood_predict_model::{MoodModel, PredictRequest};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared service state
#[derive(Clone)]
pub struct ServiceState {
    pub model: Arc<MoodModel>,
    pub config: ServiceConfig,
}

impl ServiceState {
    pub fn new(model: MoodModel, config: ServiceConfig) -> Self {
        Self {
            model: Arc::new(model),
            config,
        }
    }
}

/// Construct the service router with all endpoints and the CORS layer
pub fn service_router(state: ServiceState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    Router::new()
        .route("/predict", post(predict))
        .route("/model", get(model_info))
        .route("/health", get(health_check))
        .with_state(Arc::new(state))
        .layer(cors)
}

/// CORS restricted to `origins`. Entries that are not valid header values
/// are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "mood-predict-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn model_info(State(state): State<Arc<ServiceState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse::from(state.model.as_ref()))
}

/// Classify one submission
///
/// POST /predict
///
/// Body is a flat JSON object of features, optionally with `mood` and a
/// nested `previous_data` object. Every failure answers 400 with
/// `{"error": ..., "status": "error"}`.
async fn predict(
    State(state): State<Arc<ServiceState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = body?;
    let request = PredictRequest::from_value(&body)?;
    let result = state.model.predict(&request)?;

    tracing::info!(
        prediction = %result.prediction,
        confidence = result.confidence,
        mood_level = result.mood_level,
        "Served prediction"
    );

    Ok(Json(PredictionResponse::from(result)))
}
