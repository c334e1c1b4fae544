//! Outcome label encoding

use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// # Bidirectional mapping between class indices and outcome labels
///
/// Classes are kept sorted, a class index is its position in that order.
/// The same set of labels therefore always yields the same indices,
/// independent of the order rows appear in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the class set from the outcome column.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Self {
            classes: classes.into_iter().map(ToOwned::to_owned).collect(),
        }
    }

    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| MoodError::Dataset(format!("Unknown outcome label `{label}`")))
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            MoodError::ModelInvocation(format!(
                "Couldn't map prediction {} to any of these classes {:?}",
                index, self.classes
            ))
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sorted and free of duplicates, as `fit` produces.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.classes.windows(2).all(|w| w[0] < w[1])
    }
}
