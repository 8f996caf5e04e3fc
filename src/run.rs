//! End-to-end comparison run.
//!
//! Scan, then load and compare every pair on a bounded rayon pool, then
//! render both reports from the finished result set. Decoded rasters never
//! outlive the worker that compared them: report images for differing pairs
//! are written there, and results only carry names and paths.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::compare::{ComparisonResult, ImageComparer};
use crate::config::CompareConfig;
use crate::error::{Error, Result};
use crate::pair::LoadedPair;
use crate::report::{write_html_report, write_markdown_report, RunSummary};
use crate::scan::{scan_directories, FilePair, PairedFiles};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Counts and verdict.
    pub summary: RunSummary,
    /// Location of `index.html`.
    pub html_path: PathBuf,
    /// Location of `report.md`.
    pub markdown_path: PathBuf,
}

impl RunOutcome {
    /// Whether the run passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.summary.passed
    }
}

/// Compare two screenshot directories and write both reports.
///
/// Any unreadable directory or undecodable image aborts the whole run. The
/// `images/` directory is emptied first, so it only ever holds this run's
/// images.
pub fn run_comparison(
    baseline_dir: &Path,
    candidate_dir: &Path,
    config: &CompareConfig,
) -> Result<RunOutcome> {
    let paired = scan_directories(baseline_dir, candidate_dir)?;
    info!(
        "{} pairs, {} baseline-only, {} candidate-only",
        paired.pairs.len(),
        paired.baseline_only.len(),
        paired.candidate_only.len()
    );

    reset_images_dir(&config.images_dir())?;

    let results = compare_pairs(&paired.pairs, config)?;
    write_reports(&results, &paired, config)
}

/// Load and compare pairs in parallel, returning results in input order.
///
/// For every differing pair the worker also writes the baseline and
/// candidate report images before dropping the decoded rasters.
pub fn compare_pairs(pairs: &[FilePair], config: &CompareConfig) -> Result<Vec<ComparisonResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| Error::Config(format!("failed to build worker pool: {e}")))?;

    let comparer = ImageComparer::new(config.threshold);
    let output_dir = config.output_dir.as_path();

    // Indexed collect keeps scan order regardless of completion order
    pool.install(|| {
        pairs
            .par_iter()
            .map(|pair| -> Result<ComparisonResult> {
                let loaded = LoadedPair::load(pair, output_dir)?;
                let result = comparer.compare(&loaded)?;
                if result.has_difference {
                    loaded.write_sources()?;
                }
                Ok(result)
            })
            .collect()
    })
}

fn reset_images_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!("clearing {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Render both reports concurrently from a finished result set.
pub fn write_reports(
    results: &[ComparisonResult],
    paired: &PairedFiles,
    config: &CompareConfig,
) -> Result<RunOutcome> {
    let (html_path, markdown_path) = rayon::join(
        || write_html_report(results, &paired.baseline_only, &paired.candidate_only, &config.output_dir),
        || {
            write_markdown_report(
                results,
                &paired.baseline_only,
                &paired.candidate_only,
                &config.output_dir,
                config.max_files_shown,
            )
        },
    );

    let summary = RunSummary::new(results, &paired.baseline_only, &paired.candidate_only);
    info!(
        "{}: {} different, {} removed, {} added, {} identical",
        summary.status_text(),
        summary.different,
        summary.removed,
        summary.added,
        summary.identical
    );

    Ok(RunOutcome {
        summary,
        html_path: html_path?,
        markdown_path: markdown_path?,
    })
}
