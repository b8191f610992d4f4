use thiserror::Error;

use crate::model::record::StudentRecord;
use crate::model::value::CellValue;

#[derive(Debug, Error)]
#[error(
    "roster is missing required columns: {}; available columns: {}",
    .missing.join(", "),
    .available.join(", ")
)]
pub struct MissingColumns {
    pub missing: Vec<String>,
    pub available: Vec<String>,
}

/// The full imported student table: an ordered column list plus one record
/// per student. Pipeline stages never mutate a roster they were handed;
/// enrichment goes through [`Roster::with_column`], which returns a new
/// value and leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    columns: Vec<String>,
    rows: Vec<StudentRecord>,
}

impl Roster {
    pub fn new(columns: Vec<String>, rows: Vec<StudentRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Check that every required raw column exists before any row is
    /// processed. The error lists both the missing and the available
    /// columns so a misnamed header is easy to spot.
    pub fn ensure_columns(&self, required: &[String]) -> Result<(), MissingColumns> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.has_column(name))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingColumns {
                missing,
                available: self.columns.clone(),
            })
        }
    }

    /// Return a new roster with `column` set to `values`, one per row. An
    /// existing column of the same name is replaced in place (re-running a
    /// stage overwrites its own output); a new name is appended at the end.
    pub fn with_column(&self, column: &str, values: Vec<CellValue>) -> Roster {
        debug_assert_eq!(values.len(), self.rows.len());

        let mut next = self.clone();
        if !next.has_column(column) {
            next.columns.push(column.to_string());
        }
        for (row, value) in next.rows.iter_mut().zip(values) {
            row.set(column, value);
        }
        next
    }

    /// Distinct group labels in first-seen row order. Missing cells carry no
    /// label and are not listed.
    pub fn group_values(&self, group_column: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            let cell = row.get(group_column);
            if cell.is_missing() {
                continue;
            }
            let label = cell.to_string();
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }

    /// A new roster holding only the rows whose group cell renders as
    /// `label`. Column order is preserved.
    pub fn filter_group(&self, group_column: &str, label: &str) -> Roster {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                let cell = row.get(group_column);
                !cell.is_missing() && cell.to_string() == label
            })
            .cloned()
            .collect();
        Roster {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// A new roster with rows ordered by the rendered text of `column`,
    /// missing cells last. The sort is stable.
    pub fn sorted_by(&self, column: &str) -> Roster {
        let mut rows = self.rows.clone();
        rows.sort_by_cached_key(|row| {
            let cell = row.get(column);
            (cell.is_missing(), cell.to_string())
        });
        Roster {
            columns: self.columns.clone(),
            rows,
        }
    }
}
