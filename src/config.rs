//! Run configuration and output layout constants.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// File name of the interactive HTML report.
pub const HTML_REPORT_FILENAME: &str = "index.html";

/// File name of the Markdown summary.
pub const MARKDOWN_REPORT_FILENAME: &str = "report.md";

/// Subdirectory of the output directory holding per-pair images.
pub const IMAGES_DIR: &str = "images";

/// Default per-pixel color tolerance.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default cap on entries listed per Markdown section.
pub const MAX_FILES_SHOWN: usize = 20;

/// Configuration for a comparison run.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Directory receiving `index.html`, `report.md` and `images/`.
    pub output_dir: PathBuf,

    /// Per-pixel color tolerance in `[0, 1]`.
    pub threshold: f64,

    /// Maximum entries listed per Markdown section.
    pub max_files_shown: usize,

    /// Worker threads used for loading and comparing pairs.
    pub jobs: usize,
}

impl CompareConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }

    /// Location of the HTML report.
    #[must_use]
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(HTML_REPORT_FILENAME)
    }

    /// Location of the Markdown report.
    #[must_use]
    pub fn markdown_path(&self) -> PathBuf {
        self.output_dir.join(MARKDOWN_REPORT_FILENAME)
    }

    /// Location of the per-pair image directory.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGES_DIR)
    }
}

/// Builder for [`CompareConfig`].
#[derive(Debug, Default)]
pub struct CompareConfigBuilder {
    output_dir: Option<PathBuf>,
    threshold: Option<f64>,
    max_files_shown: Option<usize>,
    jobs: Option<usize>,
}

impl CompareConfigBuilder {
    /// Set the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the per-pixel color tolerance.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the Markdown per-section entry cap.
    #[must_use]
    pub fn max_files_shown(mut self, max: usize) -> Self {
        self.max_files_shown = Some(max);
        self
    }

    /// Set the worker count.
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<CompareConfig> {
        let threshold = self.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "threshold must be within 0.0-1.0, got {threshold}"
            )));
        }

        let max_files_shown = self.max_files_shown.unwrap_or(MAX_FILES_SHOWN);
        if max_files_shown == 0 {
            return Err(Error::Config("max files shown must be at least 1".to_string()));
        }

        let jobs = match self.jobs {
            Some(0) => return Err(Error::Config("jobs must be at least 1".to_string())),
            Some(jobs) => jobs,
            None => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        };

        Ok(CompareConfig {
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("./visual-diff")),
            threshold,
            max_files_shown,
            jobs,
        })
    }
}
