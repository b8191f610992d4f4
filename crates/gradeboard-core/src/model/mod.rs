mod bindings;
mod record;
mod roster;
mod scale;
mod status;
mod thresholds;
mod value;

pub use bindings::{BindingsError, ColumnBindings};
pub use record::StudentRecord;
pub use roster::{MissingColumns, Roster};
pub use scale::{GradeBand, GradeScale, ScaleError};
pub use status::{ModuleStatus, status_column};
pub use thresholds::{ThresholdError, ThresholdRule, ThresholdSet};
pub use value::CellValue;
