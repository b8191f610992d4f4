use gradeboard_core::{CellValue, ColumnBindings, Roster};
use tracing::warn;

/// One formatted cell plus the raw numeric value it came from, kept so the
/// renderer can compare scores against thresholds without re-parsing the
/// displayed text.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCell {
    pub text: String,
    pub raw_score: Option<f64>,
}

/// A roster projected onto display columns with presentation formatting
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<DisplayCell>>,
}

/// Project the configured display selection onto what the roster actually
/// has. An empty selection means every column; unknown names are dropped
/// with a warning so a stale config cannot sink the whole run.
pub fn effective_columns(roster: &Roster, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return roster.columns().to_vec();
    }

    let mut columns = Vec::with_capacity(requested.len());
    for name in requested {
        if roster.has_column(name) {
            columns.push(name.clone());
        } else {
            warn!(column = %name, "display column not present in roster, dropping");
        }
    }
    columns
}

/// Format a roster for presentation. Raw columns where at least one cell is
/// numeric are treated as score columns and shown with one decimal place.
/// The group and full name columns identify students rather than score
/// them, so they render as labels even when their values parse numeric,
/// and derived columns keep their label text as-is. Missing cells render
/// empty, booleans as Yes/No.
pub fn build_display_table(
    roster: &Roster,
    columns: &[String],
    bindings: &ColumnBindings,
) -> DisplayTable {
    let numeric: Vec<bool> = columns
        .iter()
        .map(|column| {
            *column != bindings.group
                && *column != bindings.full_name
                && !bindings.is_derived(column)
                && roster
                    .rows()
                    .iter()
                    .any(|row| row.get(column).as_number().is_some())
        })
        .collect();

    let rows = roster
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(&numeric)
                .map(|(column, score_column)| {
                    let cell = row.get(column);
                    DisplayCell {
                        text: format_cell(cell, *score_column),
                        raw_score: cell.as_number(),
                    }
                })
                .collect()
        })
        .collect();

    DisplayTable {
        columns: columns.to_vec(),
        rows,
    }
}

fn format_cell(cell: &CellValue, score_column: bool) -> String {
    match cell {
        CellValue::Number(value) if score_column => format!("{value:.1}"),
        CellValue::Bool(true) => "Yes".to_string(),
        CellValue::Bool(false) => "No".to_string(),
        other => other.to_string(),
    }
}
