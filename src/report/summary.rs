//! Aggregate counts and the run verdict.
//!
//! Counts are always recomputed from the result list and the two one-sided
//! lists, never stored alongside them.

use serde::Serialize;

use crate::compare::ComparisonResult;
use crate::scan::ScannedFile;

/// Derived view over a finished comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Every distinct file name seen.
    pub total: usize,
    /// Pairs with any difference, including dimension mismatches.
    pub different: usize,
    /// Files present only in the baseline.
    pub removed: usize,
    /// Files present only in the candidate.
    pub added: usize,
    /// Pairs with no differing pixels.
    pub identical: usize,
    /// Verdict: false if anything differs or was removed.
    pub passed: bool,
    /// Names of differing pairs, in result order.
    pub different_files: Vec<String>,
    /// Names of removed files, in scan order.
    pub removed_files: Vec<String>,
    /// Names of added files, in scan order.
    pub added_files: Vec<String>,
}

impl RunSummary {
    /// Summarize a result set.
    #[must_use]
    pub fn new(
        results: &[ComparisonResult],
        baseline_only: &[ScannedFile],
        candidate_only: &[ScannedFile],
    ) -> Self {
        let different_files: Vec<String> = results
            .iter()
            .filter(|r| r.has_difference)
            .map(|r| r.pair.name().to_string())
            .collect();
        let different = different_files.len();
        let removed = baseline_only.len();

        Self {
            total: results.len() + baseline_only.len() + candidate_only.len(),
            different,
            removed,
            added: candidate_only.len(),
            identical: results.len() - different,
            passed: verdict_passed(results, baseline_only),
            different_files,
            removed_files: baseline_only.iter().map(|f| f.name.clone()).collect(),
            added_files: candidate_only.iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// `"PASSED"` or `"FAILED"`.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        if self.passed { "PASSED" } else { "FAILED" }
    }
}

/// A run fails when any pair differs or any baseline file was removed.
/// Added files alone never fail a run.
#[must_use]
pub fn verdict_passed(results: &[ComparisonResult], baseline_only: &[ScannedFile]) -> bool {
    !results.iter().any(|r| r.has_difference) && baseline_only.is_empty()
}
