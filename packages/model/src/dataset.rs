//! Tabular training data
//!
//! Rows are kept as JSON objects keyed by column name, the column list keeps
//! the header order. CSV input arrives as text cells; typed sources (tests,
//! JSON exports) may carry native booleans and numbers.

use crate::error::{MoodError, Result};
use ndarray::Array2;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TrainingTable {
    columns: Vec<String>,
    rows: Vec<Value>,
}

impl TrainingTable {
    /// Build a table from header order and object rows. Every row must be an
    /// object; columns missing from a row surface when the arrays are built.
    pub fn new(columns: Vec<String>, rows: Vec<Value>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(MoodError::Dataset(format!("Duplicate column `{dup}`")));
        }
        if let Some(r) = rows.iter().position(|row| !row.is_object()) {
            return Err(MoodError::Dataset(format!("Row {r}: expected an object")));
        }
        Ok(Self { columns, rows })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MoodError::DatasetNotFound(path.to_path_buf()),
            _ => MoodError::Dataset(format!("{}: {e}", path.display())),
        })?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| MoodError::Dataset(format!("Unreadable header: {e}")))?
            .iter()
            .map(ToOwned::to_owned)
            .collect();

        let mut rows = Vec::new();
        for (r, record) in reader.records().enumerate() {
            let record = record.map_err(|e| MoodError::Dataset(format!("Row {r}: {e}")))?;
            let mut row = Map::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(record.iter()) {
                row.insert(column.clone(), Value::String(cell.to_string()));
            }
            rows.push(Value::Object(row));
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Every column except `target`, in header order.
    pub fn feature_names(&self, target: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != target)
            .cloned()
            .collect()
    }

    /// Rewrite boolean columns to native booleans.
    ///
    /// Accepts booleans, the strings "True"/"False" (any case), "1"/"0"
    /// and the numbers 1/0. Anything else is a data error.
    pub fn normalize_bool_columns(&mut self, bool_cols: &[String]) -> Result<()> {
        for col in bool_cols {
            if !self.has_column(col) {
                return Err(MoodError::Dataset(format!(
                    "Dataset doesn't contain boolean column `{col}`!"
                )));
            }
        }

        for (r, row) in self.rows.iter_mut().enumerate() {
            let Value::Object(map) = row else {
                continue;
            };
            for col in bool_cols {
                let cell = map.get(col).ok_or_else(|| {
                    MoodError::Dataset(format!("Row {r}: missing column `{col}`"))
                })?;
                let normalized = normalize_bool(cell).ok_or_else(|| {
                    MoodError::Dataset(format!(
                        "Row {r}: `{col}` is not a boolean, got `{cell}`"
                    ))
                })?;
                map.insert(col.clone(), Value::Bool(normalized));
            }
        }
        Ok(())
    }

    /// Load `features` of every row as a (rows x features) matrix, column
    /// order as given.
    pub fn records_to_array2(&self, features: &[String]) -> Result<Array2<f64>> {
        let rows = self.rows.len();
        let cols = features.len();
        let mut flat = Vec::with_capacity(rows * cols);

        for (r, value) in self.rows.iter().enumerate() {
            for col in features {
                let cell = value.get(col).ok_or_else(|| {
                    MoodError::Dataset(format!("Row {r}: expected object with key `{col}`"))
                })?;
                flat.push(cell_as_f64(cell).ok_or_else(|| {
                    MoodError::Dataset(format!(
                        "Row {r}, col `{col}`: failed to load `{cell}` as f64"
                    ))
                })?);
            }
        }

        Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| MoodError::Dataset(format!("Shape error: {e}")))
    }

    /// Outcome column as label strings. Numbers are accepted and read as
    /// their textual form.
    pub fn target_labels(&self, target: &str) -> Result<Vec<String>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(r, value)| match value.get(target) {
                Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                Some(other) => Err(MoodError::Dataset(format!(
                    "Row {r}: failed to load `{target}` as label, got `{other}`"
                ))),
                None => Err(MoodError::Dataset(format!(
                    "Row {r}: expected object with key `{target}`"
                ))),
            })
            .collect()
    }
}

fn normalize_bool(cell: &Value) -> Option<bool> {
    match cell {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn cell_as_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}
