use std::fs;
use std::path::{Path, PathBuf};

use gradeboard_core::pipeline::PipelineError;
use gradeboard_core::{MissingColumns, Roster, process_roster};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ReportConfig, ResolvedOutputs};
use crate::display::{build_display_table, effective_columns};
use crate::loader::{LoadError, SaveError, load_roster, save_roster};
use crate::render::render_group_table;
use crate::summary::{GradeTally, tally_grades};

/// Primary entry point for orchestrating a processing run.
pub struct ReportRunner {
    config: ReportConfig,
    outputs: ResolvedOutputs,
}

/// A roster that has been loaded, validated, processed and exported, ready
/// for per-group reporting.
#[derive(Debug)]
pub struct PreparedRoster {
    pub roster: Roster,
    pub evaluated_modules: Vec<String>,
    pub available_groups: Vec<String>,
    pub processed_csv: PathBuf,
}

/// Per-group artifacts produced by the reporting pass.
pub struct GroupReport {
    pub group: String,
    pub students: usize,
    pub image_path: Option<PathBuf>,
    pub tally: GradeTally,
}

/// Everything the reporting pass produced.
pub struct RunSummary {
    pub reports: Vec<GroupReport>,
    pub missing_groups: Vec<String>,
}

impl ReportRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: ReportConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Load the roster, check every required raw column is present, derive
    /// the status, eligibility and final grade columns, and export the
    /// processed roster as CSV.
    pub fn prepare(&self, roster_path: &Path) -> Result<PreparedRoster, RunnerError> {
        let raw = load_roster(roster_path)?;
        let required = self.config.columns.required_raw_columns(&self.config.thresholds);
        raw.ensure_columns(&required)?;

        let outcome = process_roster(
            &raw,
            &self.config.thresholds,
            &self.config.grade_scale,
            &self.config.columns,
        )?;

        ensure_parent(self.outputs.processed_csv.parent())?;
        let export_columns = effective_columns(&outcome.roster, &self.config.display_columns);
        save_roster(&outcome.roster, &export_columns, &self.outputs.processed_csv)?;

        let available_groups = outcome.roster.group_values(&self.config.columns.group);
        info!(
            students = outcome.roster.len(),
            modules = outcome.evaluated_modules.len(),
            groups = available_groups.len(),
            "roster processed"
        );

        Ok(PreparedRoster {
            roster: outcome.roster,
            evaluated_modules: outcome.evaluated_modules,
            available_groups,
            processed_csv: self.outputs.processed_csv.clone(),
        })
    }

    /// Render a table image and tally grades for each requested group. A
    /// group with no rows or a failed render is reported and skipped; one
    /// bad group never aborts the rest of the run.
    pub fn report_groups(&self, prepared: &PreparedRoster, requested: &[String]) -> RunSummary {
        let columns = &self.config.columns;
        let order = self.config.effective_summary_order();
        let left_aligned = [columns.full_name.clone(), columns.group.clone()];

        let mut reports = Vec::new();
        let mut missing_groups = Vec::new();

        for group in requested {
            let group_roster = prepared.roster.filter_group(&columns.group, group);
            if group_roster.is_empty() {
                warn!(group = %group, "no rows found for group, skipping");
                missing_groups.push(group.clone());
                continue;
            }

            let sorted = group_roster.sorted_by(&columns.full_name);
            let display_columns = effective_columns(&sorted, &self.config.display_columns);
            let table = build_display_table(&sorted, &display_columns, columns);

            let image_path = match render_group_table(
                &table,
                &self.config.thresholds,
                &self.config.table_visuals,
                &left_aligned,
                group,
                &self.outputs.images_dir,
            ) {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!(group = %group, error = %err, "table image not rendered");
                    None
                }
            };

            let tally = tally_grades(&sorted, &columns.final_grade, &order, group);
            reports.push(GroupReport {
                group: group.clone(),
                students: sorted.len(),
                image_path,
                tally,
            });
        }

        RunSummary {
            reports,
            missing_groups,
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    MissingColumns(#[from] MissingColumns),
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("{0}")]
    Save(#[from] SaveError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
