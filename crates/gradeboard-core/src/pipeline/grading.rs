use tracing::info;

use crate::model::{CellValue, GradeScale, Roster};
use crate::pipeline::PipelineError;

/// Grade recorded for students who failed at least one module threshold.
pub const NOT_ADMITTED: &str = "Not admitted (threshold not met)";
/// Grade recorded for admitted students whose rating cell is empty.
pub const NO_RATING_DATA: &str = "No rating data (admitted)";
/// Grade recorded for admitted students whose rating cell holds something
/// that never parsed as a finite number.
pub const INVALID_RATING: &str = "Error: invalid rating";

/// Map one student onto a grade label. Admission is checked before the
/// rating is even looked at, so an ineligible student with a missing or
/// garbled rating still reads "not admitted" rather than a data complaint.
pub fn classify_final_grade<'a>(
    eligible: bool,
    rating: &CellValue,
    scale: &'a GradeScale,
) -> &'a str {
    if !eligible {
        return NOT_ADMITTED;
    }
    match rating {
        CellValue::Missing => NO_RATING_DATA,
        CellValue::Number(value) => scale.classify(*value),
        _ => INVALID_RATING,
    }
}

/// Append the final grade column. Only an explicit boolean `true` in the
/// eligibility column admits a student; the column itself must exist, since
/// grading a roster that never went through the eligibility stage would
/// label everyone as not admitted.
pub fn apply_final_grades(
    roster: &Roster,
    eligibility_column: &str,
    rating_column: &str,
    final_grade_column: &str,
    scale: &GradeScale,
) -> Result<Roster, PipelineError> {
    if !roster.has_column(eligibility_column) {
        return Err(PipelineError::MissingDependency {
            column: eligibility_column.to_string(),
        });
    }

    let grades = roster
        .rows()
        .iter()
        .map(|record| {
            let eligible = matches!(record.get(eligibility_column), CellValue::Bool(true));
            let grade = classify_final_grade(eligible, record.get(rating_column), scale);
            CellValue::text(grade)
        })
        .collect();
    info!(column = %final_grade_column, rows = roster.len(), "final grades assigned");
    Ok(roster.with_column(final_grade_column, grades))
}
