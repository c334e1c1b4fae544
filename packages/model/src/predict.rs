//! Single-row prediction pipeline
//!
//! align by name -> coerce booleans to 0/1 -> classify -> decode label ->
//! annotate mood -> optional comparison with the previous submission.

use crate::artifact::MoodModel;
use crate::compare::compare_with_previous;
use crate::error::{MoodError, Result};
use crate::feature::FeatureRecord;
use crate::mood::{DEFAULT_MOOD_LEVEL, mood_state};
use chrono::NaiveDateTime;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MOOD_KEY: &str = "mood";
const PREVIOUS_KEY: &str = "previous_data";

/// # Parsed body of a prediction request
///
/// The body is one flat JSON object of features. `mood` is read both as a
/// feature (when the model was trained on it) and as the mood level to echo.
/// `previous_data` is a nested object of the last submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictRequest {
    pub features: FeatureRecord,
    pub mood: Option<i64>,
    pub previous: Option<FeatureRecord>,
}

impl PredictRequest {
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| MoodError::coercion("request", "expected a JSON object"))?;

        let mood = match map.get(MOOD_KEY) {
            None | Some(Value::Null) => None,
            Some(v) => Some(mood_level(v)?),
        };

        let previous = match map.get(PREVIOUS_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Object(prev)) => Some(FeatureRecord::from_json_map(prev)),
            Some(other) => {
                return Err(MoodError::coercion(
                    PREVIOUS_KEY,
                    format!("expected an object, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            features: FeatureRecord::from_json_map(map),
            mood,
            previous,
        })
    }
}

fn mood_level(value: &Value) -> Result<i64> {
    if let Some(level) = value.as_i64() {
        return Ok(level);
    }
    // form posts and CSV rows carry the level as text
    if let Some(level) = value.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
        return Ok(level);
    }
    match value.as_f64() {
        Some(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Ok(x as i64),
        _ => Err(MoodError::coercion(
            MOOD_KEY,
            format!("expected an integer mood level, got `{value}`"),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    /// Highest class probability (0.0 to 1.0)
    pub confidence: f64,
    pub mood_state: String,
    pub mood_level: i64,
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
}

impl MoodModel {
    /// One-row matrix with exactly the artifact's feature columns, in the
    /// artifact's order. Boolean columns become 0/1.
    pub fn align(&self, record: &FeatureRecord) -> Result<Array2<f64>> {
        let names = self.feature_names();
        let mut row = Vec::with_capacity(names.len());
        for name in names {
            let value = record.require(name)?;
            let cell = if self.is_bool_col(name) {
                if value.to_bool(name)? { 1.0 } else { 0.0 }
            } else {
                value.to_f64(name)?
            };
            row.push(cell);
        }
        Array2::from_shape_vec((1, row.len()), row)
            .map_err(|e| MoodError::ModelInvocation(format!("Shape error: {e}")))
    }

    /// Label and confidence for the first row of an aligned matrix.
    pub fn classify(&self, rows: &Array2<f64>) -> Result<(String, f64)> {
        let classifier = self.classifier();
        let predictions = classifier.predict(rows)?;
        let class = *predictions
            .first()
            .ok_or_else(|| MoodError::ModelInvocation("Got an empty prediction".to_string()))?;

        let proba = classifier.predict_proba(rows.row(0))?;
        let confidence = proba.iter().copied().fold(0.0_f64, f64::max);

        let label = self.label_encoder().inverse_transform(class)?;
        Ok((label.to_string(), confidence))
    }

    pub fn predict(&self, request: &PredictRequest) -> Result<PredictionResult> {
        let rows = self.align(&request.features)?;
        let (prediction, confidence) = self.classify(&rows)?;

        let mood_level = request.mood.unwrap_or(DEFAULT_MOOD_LEVEL);

        let improvements = request
            .previous
            .as_ref()
            .map(|previous| compare_with_previous(&request.features, previous))
            .transpose()?;

        tracing::debug!(%prediction, confidence, mood_level, "Predicted mood outcome");

        Ok(PredictionResult {
            prediction,
            confidence,
            mood_state: mood_state(mood_level).to_string(),
            mood_level,
            timestamp: chrono::Local::now().naive_local(),
            improvements,
        })
    }
}
