use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemaparity_core::{ComparisonReport, Config, Side};
use schemaparity_engine::PackageComparison;
use schemaparity_package::{PackageContents, Workspace};

/// SchemaParity - Semantic comparison of schema packages
#[derive(Parser)]
#[command(name = "schemaparity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Package under test (archive or extracted directory)
    candidate: PathBuf,

    /// Reference package (archive or extracted directory)
    baseline: PathBuf,

    /// Path to config file (default: $SCHEMAPARITY_CONFIG or schemaparity.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::discover()?,
    };

    // RUST_LOG wins over the configured level
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let has_differences = run(&cli, &config)?;

    // The extraction workspace is gone by now
    if has_differences {
        std::process::exit(1);
    }

    Ok(())
}

/// Compare the two packages and print the report; returns whether they differ
fn run(cli: &Cli, config: &Config) -> Result<bool> {
    let workspace = Workspace::new().context("Failed to create extraction workspace")?;
    tracing::debug!(path = %workspace.path().display(), "created extraction workspace");

    let candidate = open_package(&cli.candidate, Side::Candidate, &workspace)?;
    let baseline = open_package(&cli.baseline, Side::Baseline, &workspace)?;

    if cli.verbose {
        eprintln!("{} {}", "Comparing".cyan(), candidate.source().display());
        eprintln!("{} {}", "  against".cyan(), baseline.source().display());
    }

    let report = PackageComparison::compare(&candidate, &baseline)
        .context("Failed to compare packages")?;

    print_report(&report, config.report.max_diff_lines);

    for diagnostic in &report.diagnostics {
        eprintln!("{} {}", "⚠".yellow(), diagnostic);
    }

    if let Some(json_path) = &config.report.json_path {
        report
            .save_to_file(json_path)
            .with_context(|| format!("Failed to write JSON report to {}", json_path.display()))?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), json_path.display());
        }
    }

    Ok(report.has_differences())
}

fn open_package(path: &Path, side: Side, workspace: &Workspace) -> Result<PackageContents> {
    PackageContents::open(path, side, workspace)
        .with_context(|| format!("Failed to open {} package {}", side, path.display()))
}

/// Print the rendered report, highlighting section headers and OK lines
fn print_report(report: &ComparisonReport, max_diff_lines: usize) {
    for line in report.render(max_diff_lines).lines() {
        if line.starts_with("===") {
            println!("{}", line.bold().bright_blue());
        } else if line.starts_with("--- ") && line.ends_with(" ---") {
            println!("{}", line.bold());
        } else if line.starts_with("OK (") {
            println!("{}", line.green());
        } else if line.starts_with("Summary:") {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }

    if report.has_differences() {
        println!();
        println!("{}", "✗ Packages differ".red().bold());
    } else {
        println!();
        println!("{}", "✓ Packages are equivalent".green().bold());
    }
}
