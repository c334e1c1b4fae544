//! Mood Predict Service
//!
//! Axum router around a loaded [`MoodModel`]:
//! - `POST /predict` classifies one submission
//! - `GET /model` describes the loaded artifact
//! - `GET /health` for liveness probes
//!
//! The model is loaded once by the binary and shared read-only between
//! requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mood_predict_service::{ServiceConfig, ServiceState, service_router};
//!
//! let config = ServiceConfig::from_env()?;
//! let model = MoodModel::load(&config.model_path)?;
//! let app = service_router(ServiceState::new(model, config));
//! ```

pub mod config;
pub mod error;
pub mod router;
pub mod types;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use mood_predict_model::MoodModel;
pub use router::{ServiceState, cors_layer, service_router};
pub use types::{HealthResponse, ModelInfoResponse, PredictionResponse};
