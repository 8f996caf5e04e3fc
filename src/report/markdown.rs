//! Markdown summary sized for pull-request comments.
//!
//! Every category lists at most `max_files_shown` entries followed by a single
//! "… and N more" line; section headers always carry the true count.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::ComparisonResult;
use crate::config::MARKDOWN_REPORT_FILENAME;
use crate::error::Result;
use crate::report::summary::RunSummary;
use crate::scan::ScannedFile;

/// Render the Markdown report and write it as `report.md` in `output_dir`.
pub fn write_markdown_report(
    results: &[ComparisonResult],
    baseline_only: &[ScannedFile],
    candidate_only: &[ScannedFile],
    output_dir: &Path,
    max_files_shown: usize,
) -> Result<PathBuf> {
    let markdown = render_markdown(results, baseline_only, candidate_only, max_files_shown);
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(MARKDOWN_REPORT_FILENAME);
    fs::write(&path, markdown)?;
    Ok(path)
}

/// Build the Markdown report.
#[must_use]
pub fn render_markdown(
    results: &[ComparisonResult],
    baseline_only: &[ScannedFile],
    candidate_only: &[ScannedFile],
    max_files_shown: usize,
) -> String {
    let summary = RunSummary::new(results, baseline_only, candidate_only);
    let differences: Vec<&ComparisonResult> = results.iter().filter(|r| r.has_difference).collect();
    let identical: Vec<&ComparisonResult> = results.iter().filter(|r| !r.has_difference).collect();

    let mut md = String::new();
    let emoji = if summary.passed { "✅" } else { "❌" };
    let _ = writeln!(md, "### {emoji} Visual Diff Report — {}", summary.status_text());
    md.push('\n');

    let mut parts = Vec::new();
    for (count, label) in [
        (summary.different, "different"),
        (summary.removed, "removed"),
        (summary.added, "added"),
        (summary.identical, "identical"),
    ] {
        if count > 0 {
            parts.push(format!("**{count}** {label}"));
        }
    }
    let _ = writeln!(md, "**{}** images compared: {}", summary.total, parts.join(" · "));
    md.push('\n');

    if summary.total == 0 {
        return md;
    }

    md.push_str("<details>\n<summary>Details</summary>\n\n");

    if !differences.is_empty() {
        let _ = writeln!(md, "#### Differences ({})\n", differences.len());
        md.push_str("| File | Diff % | Notes |\n");
        md.push_str("|------|--------|-------|\n");
        for result in differences.iter().take(max_files_shown) {
            let notes = result
                .dimension_mismatch
                .as_ref()
                .map(|m| format!("⚠️ Dimension mismatch ({} → {})", m.baseline, m.candidate))
                .unwrap_or_default();
            let _ = writeln!(
                md,
                "| {} | {:.2}% | {} |",
                escape_table_cell(result.pair.name()),
                result.diff_percentage,
                notes
            );
        }
        // A blank line ends the table before the overflow note
        push_overflow(&mut md, differences.len(), max_files_shown, true);
        md.push('\n');
    }

    let removed: Vec<&str> = baseline_only.iter().map(|f| f.name.as_str()).collect();
    push_file_list(&mut md, "Removed Files", &removed, max_files_shown);

    let added: Vec<&str> = candidate_only.iter().map(|f| f.name.as_str()).collect();
    push_file_list(&mut md, "Added Files", &added, max_files_shown);

    let identical: Vec<&str> = identical.iter().map(|r| r.pair.name()).collect();
    push_file_list(&mut md, "Identical Files", &identical, max_files_shown);

    md.push_str("</details>\n");
    md
}

fn push_file_list(md: &mut String, title: &str, names: &[&str], max_files_shown: usize) {
    if names.is_empty() {
        return;
    }

    let _ = writeln!(md, "#### {title} ({})\n", names.len());
    for name in names.iter().take(max_files_shown) {
        let _ = writeln!(md, "- {}", code_span(name));
    }
    push_overflow(md, names.len(), max_files_shown, false);
    md.push('\n');
}

fn push_overflow(md: &mut String, total: usize, max_files_shown: usize, after_table: bool) {
    if total <= max_files_shown {
        return;
    }
    if after_table {
        md.push('\n');
    }
    let _ = writeln!(md, "… and {} more", total - max_files_shown);
}

/// Inline code span whose fence is longer than any backtick run in `text`.
fn code_span(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    // A span starting or ending with a backtick needs padding to stay apart
    // from the fence
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
