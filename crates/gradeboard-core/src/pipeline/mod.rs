mod eligibility;
mod grading;
mod status;

use thiserror::Error;

pub use eligibility::derive_eligibility;
pub use grading::{
    INVALID_RATING, NO_RATING_DATA, NOT_ADMITTED, apply_final_grades, classify_final_grade,
};
pub use status::{StatusOutcome, apply_module_statuses};

use crate::model::{ColumnBindings, GradeScale, Roster, ThresholdSet};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column a later stage depends on is absent, so computing the stage
    /// would produce untrustworthy values instead of an honest failure.
    #[error("derived column '{column}' is missing; downstream results would not be trustworthy")]
    MissingDependency { column: String },
}

/// Everything the processing run produced: the enriched roster plus the
/// module columns that were (and were not) found in the input.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub roster: Roster,
    pub evaluated_modules: Vec<String>,
    pub skipped_modules: Vec<String>,
}

/// Run the full derivation over a roster: per-module statuses, then the
/// eligibility gate, then final grades. Each stage hands the next a fresh
/// roster value; the input is never touched. Callers are expected to have
/// validated the required raw columns first; a threshold module missing
/// from the roster is skipped at the status stage and then surfaces here as
/// [`PipelineError::MissingDependency`] when eligibility needs it.
pub fn process_roster(
    roster: &Roster,
    thresholds: &ThresholdSet,
    scale: &GradeScale,
    bindings: &ColumnBindings,
) -> Result<ProcessOutcome, PipelineError> {
    let StatusOutcome {
        roster: with_statuses,
        evaluated,
        skipped,
    } = apply_module_statuses(roster, thresholds);

    let modules = thresholds.columns();
    let with_eligibility = derive_eligibility(&with_statuses, &modules, &bindings.eligibility)?;

    let graded = apply_final_grades(
        &with_eligibility,
        &bindings.eligibility,
        &bindings.rating,
        &bindings.final_grade,
        scale,
    )?;

    Ok(ProcessOutcome {
        roster: graded,
        evaluated_modules: evaluated,
        skipped_modules: skipped,
    })
}
