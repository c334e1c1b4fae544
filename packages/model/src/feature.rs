//! Caller-supplied feature values and their coercion rules

use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// # A single feature cell as sent by the caller
///
/// Booleans and numbers are the native shapes. Text is accepted as transport
/// for boolean-like (`"True"`) and numeric (`"7.5"`) strings and is only
/// interpreted once the artifact tells us which type the column needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Scalar JSON values map onto a variant; null, arrays and objects do not.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(FeatureValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(FeatureValue::Number),
            Value::String(s) => Some(FeatureValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Truthiness used for boolean-declared columns.
    pub fn to_bool(&self, feature: &str) -> Result<bool> {
        match self {
            FeatureValue::Bool(b) => Ok(*b),
            FeatureValue::Number(n) => Ok(*n != 0.0),
            FeatureValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(MoodError::coercion(
                    feature,
                    format!("expected a boolean, got \"{s}\""),
                )),
            },
        }
    }

    /// Numeric reading used for every column that is not boolean-declared.
    pub fn to_f64(&self, feature: &str) -> Result<f64> {
        match self {
            FeatureValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Number(n) => Ok(*n),
            FeatureValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .ok_or_else(|| {
                    MoodError::coercion(feature, format!("expected a number, got \"{s}\""))
                }),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

/// # Mapping from feature name to value for one submission
///
/// Key order carries no meaning; the artifact's feature list decides the
/// column order at inference time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: HashMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every scalar entry of a JSON object. Non-scalar entries are
    /// treated as absent.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut values = HashMap::with_capacity(map.len());
        for (name, value) in map {
            match FeatureValue::from_json(value) {
                Some(v) => {
                    values.insert(name.clone(), v);
                }
                None => tracing::debug!(feature = %name, "Skipping non-scalar feature value"),
            }
        }
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Like [`FeatureRecord::get`] but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<&FeatureValue> {
        self.values
            .get(name)
            .ok_or_else(|| MoodError::MissingFeature(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<FeatureValue>> FromIterator<(K, V)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }
}
