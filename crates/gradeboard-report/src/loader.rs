use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gradeboard_core::{CellValue, Roster, StudentRecord};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced while reading a roster file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read roster {path:?}: {source}")]
    Read {
        #[source]
        source: csv::Error,
        path: PathBuf,
    },
    #[error("roster {path:?} has no header row")]
    EmptyHeader { path: PathBuf },
    #[error("roster {path:?} has a blank column name at position {index}")]
    BlankColumn { index: usize, path: PathBuf },
    #[error("roster {path:?} declares column '{column}' more than once")]
    DuplicateColumn { column: String, path: PathBuf },
}

/// Errors surfaced while writing the processed roster.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write roster {path:?}: {source}")]
    Write {
        #[source]
        source: csv::Error,
        path: PathBuf,
    },
    #[error("failed to flush roster {path:?}: {source}")]
    Flush {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Read a CSV roster into memory. Every field goes through the same parse:
/// blank cells become missing, finite numbers become numbers, everything
/// else stays text. Header names are trimmed and must be non-blank and
/// unique, since later stages address cells by column name.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster, LoadError> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Read {
        source,
        path: path_buf.clone(),
    })?;

    let headers = reader.headers().map_err(|source| LoadError::Read {
        source,
        path: path_buf.clone(),
    })?;
    if headers.is_empty() {
        return Err(LoadError::EmptyHeader { path: path_buf });
    }

    let mut columns = Vec::with_capacity(headers.len());
    let mut seen = HashSet::new();
    for (index, raw) in headers.iter().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            return Err(LoadError::BlankColumn {
                index,
                path: path_buf,
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(LoadError::DuplicateColumn {
                column: name.to_string(),
                path: path_buf,
            });
        }
        columns.push(name.to_string());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Read {
            source,
            path: path_buf.clone(),
        })?;
        rows.push(StudentRecord::from_pairs(
            columns
                .iter()
                .zip(record.iter())
                .map(|(column, field)| (column.clone(), CellValue::parse(field))),
        ));
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "roster loaded"
    );
    Ok(Roster::new(columns, rows))
}

/// Write the given columns of a roster as CSV. Cells are written in their
/// machine form (booleans as `true`/`false`, missing as an empty field);
/// presentation formatting belongs to the table renderer.
pub fn save_roster(
    roster: &Roster,
    columns: &[String],
    path: impl AsRef<Path>,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();
    let mut writer = csv::Writer::from_path(path).map_err(|source| SaveError::Write {
        source,
        path: path_buf.clone(),
    })?;

    writer
        .write_record(columns)
        .map_err(|source| SaveError::Write {
            source,
            path: path_buf.clone(),
        })?;
    for row in roster.rows() {
        writer
            .write_record(columns.iter().map(|column| row.get(column).to_string()))
            .map_err(|source| SaveError::Write {
                source,
                path: path_buf.clone(),
            })?;
    }
    writer.flush().map_err(|source| SaveError::Flush {
        source,
        path: path_buf,
    })?;

    debug!(path = %path.display(), rows = roster.len(), "roster written");
    Ok(())
}
