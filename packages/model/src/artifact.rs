//! The persisted model artifact
//!
//! One file holds the classifier, the label encoder, the ordered feature
//! names and the boolean columns. The file extension picks the encoding:
//! JSON for readable artifacts, MessagePack for compact ones.

use crate::classifier::MoodClassifier;
use crate::encoder::LabelEncoder;
use crate::error::{MoodError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Schema version written into every artifact
pub const ARTIFACT_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    MessagePack,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ArtifactFormat::Json),
            "msgpack" | "mpk" => Some(ArtifactFormat::MessagePack),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Json => write!(f, "JSON"),
            ArtifactFormat::MessagePack => write!(f, "MessagePack"),
        }
    }
}

/// # Trained mood classifier with the metadata needed to serve it
///
/// Immutable once built. `feature_names` is the exact column order the
/// classifier was fitted on; requests are aligned to it by name.
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodModel {
    version: u8,
    trained_at: DateTime<Utc>,
    n_samples: usize,
    classifier: MoodClassifier,
    label_encoder: LabelEncoder,
    feature_names: Vec<String>,
    bool_cols: Vec<String>,
}

impl MoodModel {
    pub fn new(
        classifier: MoodClassifier,
        label_encoder: LabelEncoder,
        feature_names: Vec<String>,
        bool_cols: Vec<String>,
        n_samples: usize,
    ) -> Result<Self> {
        let model = Self {
            version: ARTIFACT_VERSION,
            trained_at: Utc::now(),
            n_samples,
            classifier,
            label_encoder,
            feature_names,
            bool_cols,
        };
        model.validate().map_err(|e| MoodError::Training(e.to_string()))?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ArtifactFormat::from_path(path).ok_or_else(|| {
            MoodError::ArtifactLoad(format!("unknown artifact extension: {}", path.display()))
        })?;
        let bytes = std::fs::read(path)
            .map_err(|e| MoodError::ArtifactLoad(format!("{}: {e}", path.display())))?;
        let model = Self::from_slice(&bytes, format)?;
        tracing::info!(
            path = %path.display(),
            %format,
            features = model.feature_names.len(),
            classes = model.label_encoder.len(),
            "Loaded mood model"
        );
        Ok(model)
    }

    /// Write the artifact to `path`. The bytes go to a temporary sibling
    /// first, so a failed save never leaves a partial artifact behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ArtifactFormat::from_path(path).ok_or_else(|| {
            MoodError::Save(format!("unknown artifact extension: {}", path.display()))
        })?;
        let bytes = self.to_vec(format)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        let written = std::fs::write(&tmp, &bytes).and_then(|_| std::fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(MoodError::Save(format!("{}: {e}", path.display())));
        }
        tracing::info!(path = %path.display(), %format, bytes = bytes.len(), "Saved mood model");
        Ok(())
    }

    pub fn to_vec(&self, format: ArtifactFormat) -> Result<Vec<u8>> {
        match format {
            ArtifactFormat::Json => serde_json::to_vec(self)
                .map_err(|e| MoodError::Save(format!("JSON serialization failed: {e}"))),
            ArtifactFormat::MessagePack => rmp_serde::to_vec_named(self)
                .map_err(|e| MoodError::Save(format!("MessagePack serialization failed: {e}"))),
        }
    }

    pub fn from_slice(bytes: &[u8], format: ArtifactFormat) -> Result<Self> {
        let model: MoodModel = match format {
            ArtifactFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| MoodError::ArtifactLoad(format!("JSON deserialization failed: {e}")))?,
            ArtifactFormat::MessagePack => rmp_serde::from_slice(bytes).map_err(|e| {
                MoodError::ArtifactLoad(format!("MessagePack deserialization failed: {e}"))
            })?,
        };
        model.validate()?;
        Ok(model)
    }

    /// Consistency checks between the classifier and its metadata.
    pub fn validate(&self) -> Result<()> {
        if self.version != ARTIFACT_VERSION {
            return Err(MoodError::ArtifactLoad(format!(
                "Unsupported artifact version: {}",
                self.version
            )));
        }
        if self.feature_names.is_empty() {
            return Err(MoodError::ArtifactLoad("artifact lists no features".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.feature_names.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(MoodError::ArtifactLoad(format!("duplicate feature `{dup}`")));
        }
        if let Some(col) = self.bool_cols.iter().find(|c| !seen.contains(c.as_str())) {
            return Err(MoodError::ArtifactLoad(format!(
                "boolean column `{col}` is not a feature"
            )));
        }
        if self.label_encoder.is_empty() || !self.label_encoder.is_well_formed() {
            return Err(MoodError::ArtifactLoad(
                "label encoder has no valid classes".to_string(),
            ));
        }
        self.classifier
            .validate(self.feature_names.len(), self.label_encoder.len())
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn bool_cols(&self) -> &[String] {
        &self.bool_cols
    }

    pub fn is_bool_col(&self, name: &str) -> bool {
        self.bool_cols.iter().any(|c| c == name)
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.label_encoder
    }

    pub fn classifier(&self) -> &MoodClassifier {
        &self.classifier
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }
}

impl fmt::Display for MoodModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decision Tree Mood Classifier ({} features, {} classes)",
            self.feature_names.len(),
            self.label_encoder.len()
        )
    }
}
