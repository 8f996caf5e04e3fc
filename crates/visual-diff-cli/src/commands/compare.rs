//! Full comparison command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;
use visual_diff::{run_comparison, CompareConfig};

/// Arguments of the `compare` subcommand.
pub struct CompareArgs {
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    pub output: PathBuf,
    pub threshold: f64,
    pub max_files: usize,
    pub jobs: Option<usize>,
    pub json: bool,
}

/// Run the comparison; returns whether the run passed.
pub fn run(args: CompareArgs) -> Result<bool> {
    let mut builder = CompareConfig::builder()
        .output_dir(&args.output)
        .threshold(args.threshold)
        .max_files_shown(args.max_files);
    if let Some(jobs) = args.jobs {
        builder = builder.jobs(jobs);
    }
    let config = builder.build().context("Invalid comparison settings")?;

    debug!(
        "comparing {} against {} with {} workers",
        args.candidate.display(),
        args.baseline.display(),
        config.jobs
    );

    let outcome = run_comparison(&args.baseline, &args.candidate, &config).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            args.baseline.display(),
            args.candidate.display()
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        let summary = &outcome.summary;
        println!(
            "{}: {} images compared ({} different, {} removed, {} added, {} identical)",
            summary.status_text(),
            summary.total,
            summary.different,
            summary.removed,
            summary.added,
            summary.identical
        );
        println!("  HTML report: {}", outcome.html_path.display());
        println!("  Markdown report: {}", outcome.markdown_path.display());
    }

    Ok(outcome.passed())
}
