pub mod model;
pub mod pipeline;

pub use model::{
    CellValue, ColumnBindings, GradeBand, GradeScale, MissingColumns, ModuleStatus, Roster,
    StudentRecord, ThresholdRule, ThresholdSet,
};
pub use pipeline::{ProcessOutcome, process_roster};
