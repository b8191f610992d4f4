use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::thresholds::ThresholdSet;

#[derive(Debug, Error)]
pub enum BindingsError {
    #[error("column binding '{binding}' must not be empty")]
    EmptyBinding { binding: &'static str },
    #[error("column bindings must be distinct; '{column}' is bound more than once")]
    DuplicateBinding { column: String },
}

/// Configured column names the pipeline works against. `group`, `full_name`
/// and `rating` must exist in the raw roster; `eligibility` and
/// `final_grade` name the columns the pipeline derives.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ColumnBindings {
    pub group: String,
    pub full_name: String,
    pub rating: String,
    pub eligibility: String,
    pub final_grade: String,
}

impl ColumnBindings {
    /// Columns that must be present before processing starts: the three raw
    /// bindings plus every threshold module column.
    pub fn required_raw_columns(&self, thresholds: &ThresholdSet) -> Vec<String> {
        let mut required = vec![
            self.group.clone(),
            self.rating.clone(),
            self.full_name.clone(),
        ];
        required.extend(thresholds.columns());
        required
    }

    /// Whether `column` is produced by the pipeline rather than read from
    /// the raw roster. Derived columns are excluded from numeric display
    /// formatting even when their content looks numeric.
    pub fn is_derived(&self, column: &str) -> bool {
        column == self.eligibility || column == self.final_grade || column.ends_with(" - Status")
    }

    pub fn validate(&self) -> Result<(), BindingsError> {
        let named = [
            ("group", &self.group),
            ("full_name", &self.full_name),
            ("rating", &self.rating),
            ("eligibility", &self.eligibility),
            ("final_grade", &self.final_grade),
        ];

        let mut seen = HashSet::new();
        for (binding, column) in named {
            if column.trim().is_empty() {
                return Err(BindingsError::EmptyBinding { binding });
            }
            if !seen.insert(column.as_str()) {
                return Err(BindingsError::DuplicateBinding {
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}
