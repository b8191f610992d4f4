pub mod config;
pub mod display;
pub mod loader;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod runner;
pub mod summary;

pub use config::{ReportConfig, ResolvedOutputs};
pub use runner::{GroupReport, PreparedRoster, ReportRunner, RunSummary};
