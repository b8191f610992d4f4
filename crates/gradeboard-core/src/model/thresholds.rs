use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("at least one threshold rule must be configured")]
    Empty,
    #[error("threshold column name must not be empty")]
    EmptyColumn,
    #[error("threshold column '{0}' is configured more than once")]
    DuplicateColumn(String),
    #[error("threshold for '{column}' must be a finite number")]
    NonFiniteScore { column: String },
}

/// One module pass rule: scores at or above `min_score` pass.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThresholdRule {
    pub column: String,
    pub min_score: f64,
}

/// Ordered pass rules, one per module column. Kept as a list rather than a
/// map so derived status columns appear in configuration order.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ThresholdSet {
    rules: Vec<ThresholdRule>,
}

impl ThresholdSet {
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.rules.iter().any(|rule| rule.column == column)
    }

    pub fn min_score(&self, column: &str) -> Option<f64> {
        self.rules
            .iter()
            .find(|rule| rule.column == column)
            .map(|rule| rule.min_score)
    }

    /// Module column names in rule order.
    pub fn columns(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.column.clone()).collect()
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.rules.is_empty() {
            return Err(ThresholdError::Empty);
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.column.trim().is_empty() {
                return Err(ThresholdError::EmptyColumn);
            }
            if !seen.insert(rule.column.as_str()) {
                return Err(ThresholdError::DuplicateColumn(rule.column.clone()));
            }
            if !rule.min_score.is_finite() {
                return Err(ThresholdError::NonFiniteScore {
                    column: rule.column.clone(),
                });
            }
        }
        Ok(())
    }
}
