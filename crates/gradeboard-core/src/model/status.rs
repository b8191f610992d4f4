use core::fmt;

use crate::model::value::CellValue;

/// Per-module pass classification. The pass boundary is inclusive: a score
/// exactly equal to the threshold passes; a missing score does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Passed,
    NotPassed,
}

impl ModuleStatus {
    pub fn from_score(score: Option<f64>, threshold: f64) -> Self {
        match score {
            Some(value) if value >= threshold => ModuleStatus::Passed,
            _ => ModuleStatus::NotPassed,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ModuleStatus::Passed => "Passed",
            ModuleStatus::NotPassed => "Not passed",
        }
    }

    pub fn matches(self, cell: &CellValue) -> bool {
        matches!(cell, CellValue::Text(text) if text == self.as_str())
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the derived status column for a module column.
pub fn status_column(module: &str) -> String {
    format!("{module} - Status")
}

#[cfg(test)]
mod tests {
    use super::{ModuleStatus, status_column};
    use crate::model::value::CellValue;

    #[test]
    fn score_equal_to_threshold_passes() {
        assert_eq!(
            ModuleStatus::from_score(Some(50.0), 50.0),
            ModuleStatus::Passed
        );
    }

    #[test]
    fn score_below_threshold_fails() {
        assert_eq!(
            ModuleStatus::from_score(Some(49.9), 50.0),
            ModuleStatus::NotPassed
        );
    }

    #[test]
    fn missing_score_fails() {
        assert_eq!(ModuleStatus::from_score(None, 50.0), ModuleStatus::NotPassed);
    }

    #[test]
    fn matches_compares_against_label_text() {
        assert!(ModuleStatus::Passed.matches(&CellValue::text("Passed")));
        assert!(!ModuleStatus::Passed.matches(&CellValue::text("Not passed")));
        assert!(!ModuleStatus::Passed.matches(&CellValue::Missing));
    }

    #[test]
    fn status_column_uses_fixed_suffix() {
        assert_eq!(status_column("Module 1"), "Module 1 - Status");
    }
}
