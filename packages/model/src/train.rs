//! Building a [`MoodModel`] from a training table

use crate::artifact::MoodModel;
use crate::classifier::{MoodClassifier, TreeParams};
use crate::dataset::TrainingTable;
use crate::encoder::LabelEncoder;
use crate::error::{MoodError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Outcome column of the mood-log dataset
pub const DEFAULT_TARGET_COL: &str = "result";

/// Columns of the mood-log dataset that hold yes/no answers
pub const DEFAULT_BOOL_COLS: [&str; 7] = [
    "trained",
    "social_interaction",
    "ate_healthy",
    "spent_time_outside",
    "meditated",
    "enough_sleep_week",
    "suicidal_thoughts",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    pub target: String,
    pub bool_cols: Vec<String>,
    pub tree: TreeParams,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_COL.to_string(),
            bool_cols: DEFAULT_BOOL_COLS.iter().map(|c| c.to_string()).collect(),
            tree: TreeParams::default(),
        }
    }
}

/// Summary of a training run, logged by the trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub n_features: usize,
    pub classes: Vec<String>,
    /// Accuracy on the training rows (0.0 to 1.0)
    pub accuracy: f64,
    pub depth: usize,
    pub leaves: usize,
}

/// Normalize, encode and fit. The returned model records the feature order
/// used for fitting, which is the table's column order minus the target.
pub fn train(mut table: TrainingTable, params: &TrainParams) -> Result<(MoodModel, TrainingReport)> {
    if table.is_empty() {
        return Err(MoodError::Dataset("Dataset has no rows".to_string()));
    }
    if !table.has_column(&params.target) {
        return Err(MoodError::Dataset(format!(
            "Dataset doesn't contain target col `{}`!",
            params.target
        )));
    }
    if params.bool_cols.iter().any(|c| *c == params.target) {
        return Err(MoodError::Dataset(format!(
            "Target col `{}` can't be a boolean feature",
            params.target
        )));
    }

    table.normalize_bool_columns(&params.bool_cols)?;

    let labels = table.target_labels(&params.target)?;
    let encoder = LabelEncoder::fit(&labels);
    let targets = labels
        .iter()
        .map(|l| encoder.transform(l))
        .collect::<Result<Array1<usize>>>()?;

    let feature_names = table.feature_names(&params.target);
    if feature_names.is_empty() {
        return Err(MoodError::Dataset("Dataset has no feature columns".to_string()));
    }
    let records = table.records_to_array2(&feature_names)?;

    tracing::debug!(
        rows = records.nrows(),
        features = records.ncols(),
        classes = encoder.len(),
        "Prepared training data"
    );

    let t0 = std::time::Instant::now();
    let classifier = MoodClassifier::fit(&records, &targets, encoder.len(), params.tree)?;
    tracing::debug!("Fit model: {:?}", t0.elapsed());

    let predictions = classifier.predict(&records)?;
    let correct = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| p == t)
        .count();
    let (depth, leaves) = classifier.shape();

    let report = TrainingReport {
        n_samples: records.nrows(),
        n_features: feature_names.len(),
        classes: encoder.classes().to_vec(),
        accuracy: correct as f64 / records.nrows() as f64,
        depth,
        leaves,
    };

    let model = MoodModel::new(
        classifier,
        encoder,
        feature_names,
        params.bool_cols.clone(),
        records.nrows(),
    )?;
    Ok((model, report))
}
