pub mod analyzer;
pub mod ignores;
pub mod matchers;
pub mod resolver;
pub mod utils;
pub mod violation;

use crate::analyzer::MockBuster;
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

/// Command line interface configuration using `clap`.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a Python file or project to analyze.
    path: PathBuf,

    /// Report violations even on lines carrying a `# mockbuster: ignore`
    /// marker.
    #[arg(long)]
    no_ignores: bool,

    /// Analyze every .py file, not just test files.
    #[arg(long)]
    all: bool,

    /// Output raw JSON instead of the human-readable report.
    #[arg(long)]
    json: bool,
}

/// Main entry point of the application.
///
/// Parses arguments, runs the scanner, prints the report, and maps the
/// outcome to the exit code: 0 when clean, 1 when any violation was found.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let buster = MockBuster::new(!cli.no_ignores, cli.all);
    let result = buster.analyze(&cli.path)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", "Mock Usage Report".bold());
        println!("=================\n");

        for report in &result.reports {
            if let Some(err) = &report.error {
                println!(
                    "{} {} ({})",
                    "skipped".yellow(),
                    report.file.display(),
                    err
                );
                continue;
            }
            for violation in &report.violations {
                println!(
                    "{}:{}: {}",
                    report.file.display(),
                    violation.line,
                    violation.message.red()
                );
            }
        }

        let summary = &result.analysis_summary;
        println!(
            "\n{} file(s) analyzed, {} violation(s) in {} file(s), {} skipped",
            summary.total_files,
            summary.violation_count,
            summary.files_with_violations,
            summary.skipped_files
        );
        if summary.violation_count == 0 {
            println!("{}", "No mock usage detected".green());
        }
    }

    if result.violation_count() > 0 {
        std::process::exit(1);
    }

    Ok(())
}
