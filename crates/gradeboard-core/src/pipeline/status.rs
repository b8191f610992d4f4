use tracing::{info, warn};

use crate::model::{CellValue, ModuleStatus, Roster, ThresholdSet, status_column};

/// Roster enriched with one status column per evaluated module, plus the
/// split between modules that were found and modules that were not.
#[derive(Debug, Clone)]
pub struct StatusOutcome {
    pub roster: Roster,
    pub evaluated: Vec<String>,
    pub skipped: Vec<String>,
}

/// Append a `"<module> - Status"` text column for every threshold rule whose
/// module column exists in the roster. A score counts as passed only when it
/// parsed as a number and is at least the rule's minimum; missing and
/// non-numeric cells fail. Rules for absent columns are skipped with a
/// warning rather than aborting the run. Re-running over an already
/// processed roster recomputes the same columns in place.
pub fn apply_module_statuses(roster: &Roster, thresholds: &ThresholdSet) -> StatusOutcome {
    let mut out = roster.clone();
    let mut evaluated = Vec::new();
    let mut skipped = Vec::new();

    for rule in thresholds.rules() {
        if !out.has_column(&rule.column) {
            warn!(
                module = %rule.column,
                "module column not found in roster, skipping its status"
            );
            skipped.push(rule.column.clone());
            continue;
        }

        let statuses = out
            .rows()
            .iter()
            .map(|record| {
                let status = ModuleStatus::from_score(
                    record.get(&rule.column).as_number(),
                    rule.min_score,
                );
                CellValue::text(status.as_str())
            })
            .collect();
        out = out.with_column(&status_column(&rule.column), statuses);
        info!(module = %rule.column, min_score = rule.min_score, "module status derived");
        evaluated.push(rule.column.clone());
    }

    StatusOutcome {
        roster: out,
        evaluated,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::apply_module_statuses;
    use crate::model::{CellValue, Roster, StudentRecord, ThresholdRule, ThresholdSet};

    fn roster() -> Roster {
        let rows = vec![
            StudentRecord::from_pairs([
                ("Name".to_string(), CellValue::text("Avery")),
                ("Module 1".to_string(), CellValue::Number(50.0)),
            ]),
            StudentRecord::from_pairs([
                ("Name".to_string(), CellValue::text("Blake")),
                ("Module 1".to_string(), CellValue::Number(49.9)),
            ]),
            StudentRecord::from_pairs([("Name".to_string(), CellValue::text("Casey"))]),
            StudentRecord::from_pairs([
                ("Name".to_string(), CellValue::text("Drew")),
                ("Module 1".to_string(), CellValue::text("absent")),
            ]),
        ];
        Roster::new(vec!["Name".to_string(), "Module 1".to_string()], rows)
    }

    fn thresholds() -> ThresholdSet {
        ThresholdSet::new(vec![ThresholdRule {
            column: "Module 1".to_string(),
            min_score: 50.0,
        }])
    }

    #[test]
    fn boundary_missing_and_text_scores() {
        let outcome = apply_module_statuses(&roster(), &thresholds());
        let statuses: Vec<&CellValue> = outcome
            .roster
            .rows()
            .iter()
            .map(|record| record.get("Module 1 - Status"))
            .collect();
        assert_eq!(
            statuses,
            vec![
                &CellValue::text("Passed"),
                &CellValue::text("Not passed"),
                &CellValue::text("Not passed"),
                &CellValue::text("Not passed"),
            ]
        );
        assert_eq!(outcome.evaluated, vec!["Module 1".to_string()]);
    }

    #[test]
    fn absent_module_column_is_skipped_not_fatal() {
        let thresholds = ThresholdSet::new(vec![
            ThresholdRule {
                column: "Module 1".to_string(),
                min_score: 50.0,
            },
            ThresholdRule {
                column: "Module 7".to_string(),
                min_score: 40.0,
            },
        ]);
        let outcome = apply_module_statuses(&roster(), &thresholds);
        assert_eq!(outcome.evaluated, vec!["Module 1".to_string()]);
        assert_eq!(outcome.skipped, vec!["Module 7".to_string()]);
        assert!(outcome.roster.has_column("Module 1 - Status"));
        assert!(!outcome.roster.has_column("Module 7 - Status"));
    }

    #[test]
    fn rerunning_overwrites_stale_statuses() {
        let first = apply_module_statuses(&roster(), &thresholds());
        let relaxed = ThresholdSet::new(vec![ThresholdRule {
            column: "Module 1".to_string(),
            min_score: 40.0,
        }]);
        let second = apply_module_statuses(&first.roster, &relaxed);

        assert_eq!(first.roster.columns(), second.roster.columns());
        assert_eq!(
            second.roster.rows()[1].get("Module 1 - Status"),
            &CellValue::text("Passed")
        );
    }
}
