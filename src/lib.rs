//! # visual-diff
//!
//! Visual regression comparator for directories of rendered screenshots.
//!
//! Two runs (a *baseline* and a *candidate*) are paired by file name, each
//! pair is classified as identical, different, or dimensionally mismatched,
//! and the result set is rendered as an interactive HTML report plus a
//! bounded Markdown summary.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use visual_diff::{run_comparison, CompareConfig};
//!
//! let config = CompareConfig::builder()
//!     .output_dir("./results")
//!     .build()?;
//!
//! let outcome = run_comparison("baseline".as_ref(), "candidate".as_ref(), &config)?;
//! std::process::exit(if outcome.passed() { 0 } else { 1 });
//! ```
//!
//! ## Modules
//!
//! - [`scan`]: directory listing and filename pairing
//! - [`pair`]: eager decoding of image pairs
//! - [`compare`]: per-pixel classification and diff images
//! - [`report`]: HTML and Markdown renderers
//! - [`run`]: parallel end-to-end pipeline

pub mod compare;
pub mod config;
pub mod error;
pub mod pair;
pub mod report;
pub mod run;
pub mod scan;

// Re-export commonly used types
pub use compare::{ComparisonResult, ImageComparer, PixelDiff};
pub use config::{CompareConfig, CompareConfigBuilder};
pub use error::{Error, Result};
pub use pair::{DimensionMismatch, ImageRole, LoadedPair, PairInfo};
pub use report::RunSummary;
pub use run::{run_comparison, RunOutcome};
pub use scan::{pair_files, scan_directories, FilePair, PairedFiles, ScannedFile};
