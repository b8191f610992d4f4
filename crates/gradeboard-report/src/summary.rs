use core::fmt;

use gradeboard_core::Roster;

/// Final grade counts for one group, in the configured category order.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeTally {
    pub group: String,
    pub counts: Vec<(String, usize)>,
    pub total: usize,
}

/// Count final grades for an already-filtered group roster. Every category
/// in `order` appears in the result, zero when absent; the total counts all
/// students even when some carry a grade outside the configured order.
pub fn tally_grades(
    roster: &Roster,
    final_grade_column: &str,
    order: &[String],
    group: &str,
) -> GradeTally {
    let counts = order
        .iter()
        .map(|label| {
            let count = roster
                .rows()
                .iter()
                .filter(|row| row.get(final_grade_column).to_string() == *label)
                .count();
            (label.clone(), count)
        })
        .collect();

    GradeTally {
        group: group.to_string(),
        counts,
        total: roster.len(),
    }
}

impl fmt::Display for GradeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Final grade summary for group '{}' ---", self.group)?;
        let width = self
            .counts
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, count) in &self.counts {
            writeln!(f, "{label:<width$}  {count}")?;
        }
        write!(f, "Total students in group: {}", self.total)
    }
}
