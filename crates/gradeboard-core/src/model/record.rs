use std::collections::HashMap;

use crate::model::value::CellValue;

const MISSING: &CellValue = &CellValue::Missing;

/// One student row: a mapping from column name to cell value. The roster's
/// column list decides which columns exist; a key absent here reads as
/// missing rather than as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRecord {
    values: HashMap<String, CellValue>,
}

impl StudentRecord {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, CellValue)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(MISSING)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.values.insert(column.into(), value);
    }
}
