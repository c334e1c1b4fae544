use chrono::{DateTime, Utc};
use mood_predict_model::{MoodModel, PredictionResult};
use serde::{Deserialize, Serialize};

const STATUS_SUCCESS: &str = "success";

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Successful `POST /predict` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub status: String,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            result,
            status: STATUS_SUCCESS.to_string(),
        }
    }
}

/// Description of the loaded artifact (`GET /model`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub feature_names: Vec<String>,
    pub bool_cols: Vec<String>,
    pub classes: Vec<String>,
    pub version: u8,
    pub trained_at: DateTime<Utc>,
    pub n_samples: usize,
    pub status: String,
}

impl From<&MoodModel> for ModelInfoResponse {
    fn from(model: &MoodModel) -> Self {
        Self {
            feature_names: model.feature_names().to_vec(),
            bool_cols: model.bool_cols().to_vec(),
            classes: model.label_encoder().classes().to_vec(),
            version: model.version(),
            trained_at: model.trained_at(),
            n_samples: model.n_samples(),
            status: STATUS_SUCCESS.to_string(),
        }
    }
}
