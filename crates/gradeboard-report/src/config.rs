use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use gradeboard_core::pipeline::{NO_RATING_DATA, NOT_ADMITTED};
use gradeboard_core::{ColumnBindings, GradeScale, ThresholdSet};
use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

const DEFAULT_CELL_HEIGHT: u32 = 44;
const DEFAULT_BASE_COLUMN_WIDTH: u32 = 220;
const DEFAULT_FONT_SIZE_CELL: u32 = 16;
const DEFAULT_FONT_SIZE_HEADER: u32 = 18;
const DEFAULT_WIDTH_RATIO: f64 = 1.0;

const DEFAULT_HEADER_BG: Rgb = Rgb {
    r: 0x40,
    g: 0x46,
    b: 0x6E,
};
const DEFAULT_HEADER_TEXT: Rgb = Rgb {
    r: 0xFF,
    g: 0xFF,
    b: 0xFF,
};
const DEFAULT_PASSED_CELL: Rgb = Rgb {
    r: 0xF1,
    g: 0xF1,
    b: 0xF2,
};
const DEFAULT_FAILED_CELL: Rgb = Rgb {
    r: 0xFF,
    g: 0xCC,
    b: 0xCC,
};

const PROCESSED_CSV_FILE: &str = "roster_processed.csv";
const RUN_LOG_FILE: &str = "run_log.jsonl";

/// Root report configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub thresholds: ThresholdSet,
    pub columns: ColumnBindings,
    pub grade_scale: GradeScale,
    #[serde(default)]
    pub display_columns: Vec<String>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub table_visuals: TableVisuals,
    #[serde(default)]
    pub summary_order: Vec<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReportConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ReportConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.thresholds
            .validate()
            .map_err(|err| ValidationError::InvalidField {
                field: "thresholds".to_string(),
                message: err.to_string(),
            })?;
        self.columns
            .validate()
            .map_err(|err| ValidationError::InvalidField {
                field: "columns".to_string(),
                message: err.to_string(),
            })?;
        self.grade_scale
            .validate()
            .map_err(|err| ValidationError::InvalidField {
                field: "grade_scale".to_string(),
                message: err.to_string(),
            })?;

        for rule in self.thresholds.rules() {
            if self.columns.is_derived(&rule.column) {
                return Err(ValidationError::InvalidField {
                    field: "thresholds".to_string(),
                    message: format!(
                        "module column '{}' collides with a derived column name",
                        rule.column
                    ),
                });
            }
        }

        for column in &self.display_columns {
            if column.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "display_columns".to_string(),
                    message: "column name must not be empty".to_string(),
                });
            }
        }

        for label in &self.summary_order {
            if label.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "summary_order".to_string(),
                    message: "category label must not be empty".to_string(),
                });
            }
        }

        self.outputs.validate()?;
        self.table_visuals.validate()?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve the output directories into concrete artifact paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let data_dir = PathBuf::from(&self.outputs.data_dir);
        ResolvedOutputs {
            processed_csv: data_dir.join(PROCESSED_CSV_FILE),
            run_log: data_dir.join(RUN_LOG_FILE),
            images_dir: PathBuf::from(&self.outputs.images_dir),
        }
    }

    /// Category order for the per-group tallies. An explicit `summary_order`
    /// wins; otherwise the scale labels are followed by the two admission
    /// sentinels.
    pub fn effective_summary_order(&self) -> Vec<String> {
        if !self.summary_order.is_empty() {
            return self.summary_order.clone();
        }
        let mut order: Vec<String> = self
            .grade_scale
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();
        order.push(NOT_ADMITTED.to_string());
        order.push(NO_RATING_DATA.to_string());
        order
    }
}

/// Output directory configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub data_dir: String,
    pub images_dir: String,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.data_dir", &self.data_dir),
            ("outputs.images_dir", &self.images_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fully resolved output artifact paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub processed_csv: PathBuf,
    pub run_log: PathBuf,
    pub images_dir: PathBuf,
}

/// An `#RRGGBB` color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{value}' must start with '#'"))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color '{value}' must be in #RRGGBB form"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("color '{value}' must be in #RRGGBB form"))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Table rendering knobs, all sized in pixels.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableVisuals {
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    #[serde(default = "default_base_column_width")]
    pub base_column_width: u32,
    #[serde(default = "default_font_size_cell")]
    pub font_size_cell: u32,
    #[serde(default = "default_font_size_header")]
    pub font_size_header: u32,
    #[serde(default = "default_header_bg_color")]
    pub header_bg_color: Rgb,
    #[serde(default = "default_header_text_color")]
    pub header_text_color: Rgb,
    #[serde(default = "default_passed_cell_color")]
    pub passed_cell_color: Rgb,
    #[serde(default = "default_failed_cell_color")]
    pub failed_cell_color: Rgb,
    #[serde(default)]
    pub column_width_ratios: BTreeMap<String, f64>,
    #[serde(default = "default_width_ratio")]
    pub default_width_ratio: f64,
}

impl Default for TableVisuals {
    fn default() -> Self {
        Self {
            cell_height: DEFAULT_CELL_HEIGHT,
            base_column_width: DEFAULT_BASE_COLUMN_WIDTH,
            font_size_cell: DEFAULT_FONT_SIZE_CELL,
            font_size_header: DEFAULT_FONT_SIZE_HEADER,
            header_bg_color: DEFAULT_HEADER_BG,
            header_text_color: DEFAULT_HEADER_TEXT,
            passed_cell_color: DEFAULT_PASSED_CELL,
            failed_cell_color: DEFAULT_FAILED_CELL,
            column_width_ratios: BTreeMap::new(),
            default_width_ratio: DEFAULT_WIDTH_RATIO,
        }
    }
}

impl TableVisuals {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("table_visuals.cell_height", self.cell_height),
            ("table_visuals.base_column_width", self.base_column_width),
            ("table_visuals.font_size_cell", self.font_size_cell),
            ("table_visuals.font_size_header", self.font_size_header),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidField {
                    field: field.to_string(),
                    message: "value must be greater than zero".to_string(),
                });
            }
        }

        if !self.default_width_ratio.is_finite() || self.default_width_ratio <= 0.0 {
            return Err(ValidationError::InvalidField {
                field: "table_visuals.default_width_ratio".to_string(),
                message: "ratio must be a positive finite number".to_string(),
            });
        }

        for (column, ratio) in &self.column_width_ratios {
            if !ratio.is_finite() || *ratio < 0.0 {
                return Err(ValidationError::InvalidField {
                    field: format!("table_visuals.column_width_ratios.{column}"),
                    message: "ratio must be a non-negative finite number".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn default_cell_height() -> u32 {
    DEFAULT_CELL_HEIGHT
}

fn default_base_column_width() -> u32 {
    DEFAULT_BASE_COLUMN_WIDTH
}

fn default_font_size_cell() -> u32 {
    DEFAULT_FONT_SIZE_CELL
}

fn default_font_size_header() -> u32 {
    DEFAULT_FONT_SIZE_HEADER
}

fn default_header_bg_color() -> Rgb {
    DEFAULT_HEADER_BG
}

fn default_header_text_color() -> Rgb {
    DEFAULT_HEADER_TEXT
}

fn default_passed_cell_color() -> Rgb {
    DEFAULT_PASSED_CELL
}

fn default_failed_cell_color() -> Rgb {
    DEFAULT_FAILED_CELL
}

fn default_width_ratio() -> f64 {
    DEFAULT_WIDTH_RATIO
}

/// Logging configuration defaults to console output only.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r##"
thresholds:
  - column: "Module 1"
    min_score: 50
  - column: "Module 2"
    min_score: 40
columns:
  group: "Group"
  full_name: "Full Name"
  rating: "Rating"
  eligibility: "Admitted to grading"
  final_grade: "Final grade"
grade_scale:
  bands:
    - label: "Excellent"
      min_rating: 90
    - label: "Good"
      min_rating: 75
    - label: "Satisfactory"
      min_rating: 60
  fallback: "Unsatisfactory"
outputs:
  data_dir: "out/data"
  images_dir: "out/images"
table_visuals:
  cell_height: 40
  header_bg_color: "#4C72B0"
  column_width_ratios:
    "Full Name": 2.5
logging:
  enable_structured: true
  tracing_level: "debug"
"##;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: ReportConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.table_visuals.cell_height, 40);
        assert_eq!(cfg.table_visuals.base_column_width, DEFAULT_BASE_COLUMN_WIDTH);
        assert_eq!(
            cfg.table_visuals.header_bg_color,
            Rgb {
                r: 0x4C,
                g: 0x72,
                b: 0xB0
            }
        );
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.processed_csv,
            PathBuf::from("out/data/roster_processed.csv")
        );
        assert_eq!(outputs.images_dir, PathBuf::from("out/images"));
    }

    #[test]
    fn default_summary_order_is_scale_then_sentinels() {
        let mut cfg: ReportConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(
            cfg.effective_summary_order(),
            vec![
                "Excellent".to_string(),
                "Good".to_string(),
                "Satisfactory".to_string(),
                "Unsatisfactory".to_string(),
                NOT_ADMITTED.to_string(),
                NO_RATING_DATA.to_string(),
            ]
        );
    }

    #[test]
    fn rejects_non_descending_scale() {
        let yaml = BASIC_YAML.replace("min_rating: 75", "min_rating: 95");
        let mut cfg: ReportConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("ascending cutoffs should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "grade_scale"
        ));
    }

    #[test]
    fn rejects_threshold_on_a_derived_column() {
        let yaml = BASIC_YAML.replace("column: \"Module 2\"", "column: \"Final grade\"");
        let mut cfg: ReportConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("derived collision should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "thresholds"
        ));
    }

    #[test]
    fn rejects_duplicate_column_bindings() {
        let yaml = BASIC_YAML.replace("final_grade: \"Final grade\"", "final_grade: \"Rating\"");
        let mut cfg: ReportConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate binding should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "columns"
        ));
    }

    #[test]
    fn rejects_malformed_color_at_parse_time() {
        let yaml = BASIC_YAML.replace("#4C72B0", "4C72B0");
        let parsed: Result<ReportConfig, _> = serde_yaml::from_str(&yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_zero_cell_height() {
        let yaml = BASIC_YAML.replace("cell_height: 40", "cell_height: 0");
        let mut cfg: ReportConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero height should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table_visuals.cell_height"
        ));
    }
}
