use tracing::info;

use crate::model::{CellValue, ModuleStatus, Roster, status_column};
use crate::pipeline::PipelineError;

/// Append the boolean eligibility column: a student is admitted to final
/// grading only when every module status column says passed. The status
/// columns for all `modules` must already exist; refusing to proceed on a
/// missing one is what keeps a half-evaluated roster from quietly marking
/// everyone ineligible.
pub fn derive_eligibility(
    roster: &Roster,
    modules: &[String],
    eligibility_column: &str,
) -> Result<Roster, PipelineError> {
    let status_columns: Vec<String> = modules.iter().map(|module| status_column(module)).collect();
    for column in &status_columns {
        if !roster.has_column(column) {
            return Err(PipelineError::MissingDependency {
                column: column.clone(),
            });
        }
    }

    let flags = roster
        .rows()
        .iter()
        .map(|record| {
            let admitted = status_columns
                .iter()
                .all(|column| ModuleStatus::Passed.matches(record.get(column)));
            CellValue::Bool(admitted)
        })
        .collect();
    info!(column = %eligibility_column, modules = modules.len(), "eligibility derived");
    Ok(roster.with_column(eligibility_column, flags))
}
