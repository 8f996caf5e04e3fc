//! Directory scanning and filename pairing.
//!
//! Both directories are listed (non-recursively), PNG entries are collected,
//! and the two listings are partitioned into matched pairs plus the entries
//! that exist on only one side. All lists come back sorted by name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::pair::unique_output_stems;

/// Extension (compared case-insensitively) of files considered for comparison.
const SCREENSHOT_EXTENSION: &str = "png";

/// A file found in the baseline or candidate directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedFile {
    /// File name, the pairing key.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
}

impl ScannedFile {
    /// Create a scanned file entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A baseline/candidate file sharing the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePair {
    /// Shared file name.
    pub name: String,
    /// Stem for this pair's report images, unique among the pairs of a scan.
    pub output_stem: String,
    /// Baseline file location.
    pub baseline_path: PathBuf,
    /// Candidate file location.
    pub candidate_path: PathBuf,
}

/// Result of pairing two directory listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairedFiles {
    /// Files present in both directories.
    pub pairs: Vec<FilePair>,
    /// Files present only in the baseline directory (removed).
    pub baseline_only: Vec<ScannedFile>,
    /// Files present only in the candidate directory (added).
    pub candidate_only: Vec<ScannedFile>,
}

impl PairedFiles {
    /// Total number of distinct names across both directories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pairs.len() + self.baseline_only.len() + self.candidate_only.len()
    }
}

/// Scan both directories and pair their screenshots by exact file name.
pub fn scan_directories(baseline_dir: &Path, candidate_dir: &Path) -> Result<PairedFiles> {
    let baseline = list_screenshots(baseline_dir)?;
    let candidate = list_screenshots(candidate_dir)?;
    Ok(pair_files(baseline, candidate))
}

/// Partition two listings into pairs and one-sided entries.
///
/// Matching is case-sensitive. Input order does not matter; every output list
/// is sorted by name. Pairs whose names sanitize to the same output stem get
/// distinct stems (see [`unique_output_stems`]).
#[must_use]
pub fn pair_files(baseline: Vec<ScannedFile>, candidate: Vec<ScannedFile>) -> PairedFiles {
    let mut candidate_by_name: BTreeMap<String, ScannedFile> = candidate
        .into_iter()
        .map(|file| (file.name.clone(), file))
        .collect();

    let mut baseline_sorted = baseline;
    baseline_sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut paired = PairedFiles::default();
    for file in baseline_sorted {
        match candidate_by_name.remove(&file.name) {
            Some(other) => paired.pairs.push(FilePair {
                name: file.name,
                output_stem: String::new(),
                baseline_path: file.path,
                candidate_path: other.path,
            }),
            None => paired.baseline_only.push(file),
        }
    }
    // BTreeMap iteration is already name-ordered
    paired.candidate_only = candidate_by_name.into_values().collect();

    let stems = unique_output_stems(paired.pairs.iter().map(|p| p.name.as_str()));
    for (pair, stem) in paired.pairs.iter_mut().zip(stems) {
        pair.output_stem = stem;
    }

    paired
}

fn list_screenshots(dir: &Path) -> Result<Vec<ScannedFile>> {
    if !dir.exists() {
        return Err(Error::Scan {
            path: dir.to_path_buf(),
            reason: "directory does not exist".to_string(),
        });
    }

    if !dir.is_dir() {
        return Err(Error::Scan {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| Error::Scan {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Scan {
            path: dir.to_path_buf(),
            reason: format!("failed to read entry: {e}"),
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        // Skip hidden files
        if name.starts_with('.') || !is_screenshot(&path) {
            continue;
        }

        files.push(ScannedFile::new(name, &path));
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("scanned {}: {} screenshots", dir.display(), files.len());

    Ok(files)
}

fn is_screenshot(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCREENSHOT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, dir: &str) -> ScannedFile {
        ScannedFile::new(name, format!("/{dir}/{name}"))
    }

    #[test]
    fn test_pair_files_partitions() {
        let baseline = vec![file("b.png", "base"), file("a.png", "base"), file("gone.png", "base")];
        let candidate = vec![file("new.png", "cand"), file("a.png", "cand"), file("b.png", "cand")];

        let paired = pair_files(baseline, candidate);

        let names: Vec<&str> = paired.pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(paired.pairs[0].baseline_path, PathBuf::from("/base/a.png"));
        assert_eq!(paired.pairs[0].candidate_path, PathBuf::from("/cand/a.png"));
        assert_eq!(paired.baseline_only, vec![file("gone.png", "base")]);
        assert_eq!(paired.candidate_only, vec![file("new.png", "cand")]);
        assert_eq!(paired.total(), 4);
    }

    #[test]
    fn test_pair_files_case_sensitive() {
        let paired = pair_files(vec![file("Home.png", "base")], vec![file("home.png", "cand")]);
        assert!(paired.pairs.is_empty());
        assert_eq!(paired.baseline_only.len(), 1);
        assert_eq!(paired.candidate_only.len(), 1);
    }

    #[test]
    fn test_pair_files_sorted_candidate_only() {
        let paired = pair_files(
            Vec::new(),
            vec![file("z.png", "cand"), file("m.png", "cand"), file("a.png", "cand")],
        );
        let names: Vec<&str> = paired.candidate_only.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "m.png", "z.png"]);
    }

    #[test]
    fn test_pair_files_assigns_unique_stems() {
        let names = ["a b.png", "a_b.png", "plain.png"];
        let paired = pair_files(
            names.iter().map(|n| file(n, "base")).collect(),
            names.iter().map(|n| file(n, "cand")).collect(),
        );

        let stems: Vec<&str> = paired.pairs.iter().map(|p| p.output_stem.as_str()).collect();
        assert_eq!(stems, vec!["a_b", "a_b-2", "plain"]);
    }

    #[test]
    fn test_scan_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let baseline = tmp.path().join("baseline");
        let candidate = tmp.path().join("candidate");
        fs::create_dir_all(baseline.join("nested")).unwrap();
        fs::create_dir_all(&candidate).unwrap();

        fs::write(baseline.join("same.png"), b"x").unwrap();
        fs::write(baseline.join("removed.png"), b"x").unwrap();
        fs::write(baseline.join("notes.txt"), b"x").unwrap();
        fs::write(baseline.join(".hidden.png"), b"x").unwrap();
        fs::write(candidate.join("same.png"), b"x").unwrap();
        fs::write(candidate.join("ADDED.PNG"), b"x").unwrap();

        let paired = scan_directories(&baseline, &candidate).unwrap();

        assert_eq!(paired.pairs.len(), 1);
        assert_eq!(paired.pairs[0].name, "same.png");
        assert_eq!(paired.pairs[0].baseline_path, baseline.join("same.png"));
        assert_eq!(paired.baseline_only.len(), 1);
        assert_eq!(paired.baseline_only[0].name, "removed.png");
        assert_eq!(paired.candidate_only.len(), 1);
        assert_eq!(paired.candidate_only[0].name, "ADDED.PNG");
    }

    #[test]
    fn test_scan_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");

        let err = scan_directories(&missing, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Scan { .. }));
    }

    #[test]
    fn test_scan_file_instead_of_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let not_dir = tmp.path().join("file.png");
        fs::write(&not_dir, b"x").unwrap();

        let err = scan_directories(tmp.path(), &not_dir).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
