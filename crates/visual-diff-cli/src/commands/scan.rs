//! Pairing preview command.

use std::path::Path;

use anyhow::{Context, Result};
use visual_diff::scan_directories;

pub fn run(baseline: &Path, candidate: &Path, json: bool) -> Result<()> {
    let paired = scan_directories(baseline, candidate).with_context(|| {
        format!("Failed to scan {} and {}", baseline.display(), candidate.display())
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&paired)?);
        return Ok(());
    }

    println!("Paired: {}", paired.pairs.len());
    for pair in &paired.pairs {
        println!("  {}", pair.name);
    }

    println!("Baseline only (removed): {}", paired.baseline_only.len());
    for file in &paired.baseline_only {
        println!("  {}", file.name);
    }

    println!("Candidate only (added): {}", paired.candidate_only.len());
    for file in &paired.candidate_only {
        println!("  {}", file.name);
    }

    Ok(())
}
