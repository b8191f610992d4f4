use core::fmt;

use serde::{Deserialize, Serialize};

/// One roster cell. Numeric-ness is decided exactly once, when the raw field
/// is parsed at the ingestion boundary; every later stage (classification,
/// display formatting, cell coloring) goes through [`CellValue::as_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

impl CellValue {
    /// Parse one raw tabular field. A blank field is missing, a finite
    /// number is numeric, and anything else stays text. "nan"/"inf" stay
    /// text so threshold and grade comparisons only ever see finite values.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => CellValue::Number(value),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Bool(flag) => write!(f, "{flag}"),
            CellValue::Missing => Ok(()),
        }
    }
}
