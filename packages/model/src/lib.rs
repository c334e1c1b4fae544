//! Mood prediction model
//!
//! Everything the trainer and the prediction service share: the persisted
//! artifact (decision tree + label encoder + feature schema), dataset
//! loading, feature alignment and the per-request prediction pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mood_predict_model::{MoodModel, PredictRequest};
//!
//! let model = MoodModel::load("mood_model.json")?;
//! let request = PredictRequest::from_value(body)?;
//! let result = model.predict(&request)?;
//! ```

pub mod artifact;
pub mod classifier;
pub mod compare;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod feature;
pub mod mood;
pub mod predict;
pub mod train;

#[cfg(test)]
mod tests;

pub use artifact::{ARTIFACT_VERSION, ArtifactFormat, MoodModel};
pub use classifier::{MoodClassifier, TreeParams};
pub use compare::{KEY_FACTORS, KeyFactor, compare_with_previous};
pub use dataset::TrainingTable;
pub use encoder::LabelEncoder;
pub use error::{ErrorKind, MoodError, Result};
pub use feature::{FeatureRecord, FeatureValue};
pub use mood::{DEFAULT_MOOD_LEVEL, mood_state};
pub use predict::{PredictRequest, PredictionResult};
pub use train::{DEFAULT_BOOL_COLS, DEFAULT_TARGET_COL, TrainParams, TrainingReport, train};
