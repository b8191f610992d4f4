use std::io;
use std::path::PathBuf;

use clap::Parser;

use gradeboard_report::config::ReportConfig;
use gradeboard_report::logging::init_logging;
use gradeboard_report::prompt::{parse_group_selection, prompt_group_selection, prompt_roster_path};
use gradeboard_report::runner::ReportRunner;

/// Roster processing and report generation for course grading.
#[derive(Debug, Parser)]
#[command(
    name = "gradeboard",
    author,
    version,
    about = "Grade roster processor and report generator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "gradeboard.yaml")]
    config: PathBuf,

    /// Roster CSV to process (prompted for when omitted).
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Comma-separated group labels to render (prompted for when omitted).
    #[arg(long, value_name = "GROUPS")]
    groups: Option<String>,

    /// Exit after validating the configuration (no roster is processed).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ReportConfig::from_path(&cli.config)?;

    let outputs = config.resolved_outputs();
    let module_count = config.thresholds.rules().len();
    let band_count = config.grade_scale.bands().len();
    println!(
        "Loaded configuration with {module_count} module threshold{} and {band_count} grade band{}",
        if module_count == 1 { "" } else { "s" },
        if band_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    if let Some(guard) = logging_guard.as_ref() {
        println!("Structured run log: {}", guard.run_log_path.display());
    }

    if cli.validate_only {
        println!("Validation-only mode: roster processing skipped.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let roster_path = match cli.roster {
        Some(path) => path,
        None => PathBuf::from(prompt_roster_path(&mut input, &mut output)?),
    };

    let runner = ReportRunner::new(config, outputs);
    let prepared = runner.prepare(&roster_path)?;
    println!(
        "Processed {} students across {} modules; roster saved to {}",
        prepared.roster.len(),
        prepared.evaluated_modules.len(),
        prepared.processed_csv.display()
    );

    let requested = match cli.groups {
        Some(raw) => parse_group_selection(&raw),
        None => prompt_group_selection(&prepared.available_groups, &mut input, &mut output)?,
    };
    if requested.is_empty() {
        println!("No groups selected; skipping table images.");
        return Ok(());
    }

    let summary = runner.report_groups(&prepared, &requested);
    for report in &summary.reports {
        println!();
        match report.image_path.as_ref() {
            Some(path) => println!(
                "Results table for group '{}' saved to {}",
                report.group,
                path.display()
            ),
            None => println!("Results table for group '{}' was not rendered", report.group),
        }
        println!("{}", report.tally);
    }
    if !summary.missing_groups.is_empty() {
        println!(
            "\nNo roster rows found for: {}",
            summary.missing_groups.join(", ")
        );
    }

    let rendered = summary
        .reports
        .iter()
        .filter(|report| report.image_path.is_some())
        .count();
    println!(
        "\nProcessing complete: {rendered} of {} requested group(s) rendered; processed roster at {}",
        requested.len(),
        prepared.processed_csv.display()
    );
    Ok(())
}
