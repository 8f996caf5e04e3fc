//! Self-contained interactive HTML report.
//!
//! The document embeds its own styles and script so it works when opened
//! straight from disk. Every report image sits inside a trigger button that
//! opens a single modal viewer; the viewer navigates a grid whose rows are
//! the differing pairs and whose columns are the image roles of each pair.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::compare::ComparisonResult;
use crate::config::HTML_REPORT_FILENAME;
use crate::error::Result;
use crate::report::summary::RunSummary;
use crate::scan::ScannedFile;

const STYLES: &str = r#"
:root { color-scheme: light dark; --pass: #1a7f37; --fail: #cf222e; --muted: #6e7781; --border: #d0d7de; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; line-height: 1.5; }
main { max-width: 1400px; margin: 0 auto; padding: 1.5rem; }
h1 { margin-top: 0; }
.status { display: inline-block; padding: 0.5rem 1rem; border-radius: 6px; font-weight: 700; color: #fff; }
.status-pass { background: var(--pass); }
.status-fail { background: var(--fail); }
.summary { border-collapse: collapse; margin: 1.5rem 0; }
.summary th, .summary td { padding: 0.25rem 1rem; border-bottom: 1px solid var(--border); text-align: left; }
.diff-group { border: 1px solid var(--border); border-radius: 6px; padding: 1rem; margin-bottom: 1.5rem; }
.diff-group h3 { margin: 0 0 0.5rem; word-break: break-all; }
.diff-percentage { color: var(--fail); font-weight: 400; margin-left: 0.5rem; }
.mismatch-note { margin: 0 0 0.75rem; color: var(--fail); }
.diff-images { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; }
.diff-images figure { margin: 0; }
.diff-images figcaption { color: var(--muted); font-size: 0.875rem; text-align: center; }
.lightbox-trigger { display: block; width: 100%; padding: 0; border: 1px solid var(--border); background: repeating-conic-gradient(#eee 0 25%, #fff 0 50%) 0 0 / 16px 16px; cursor: zoom-in; }
.lightbox-trigger:focus-visible { outline: 3px solid #0969da; outline-offset: 2px; }
.lightbox-trigger img { display: block; width: 100%; height: auto; }
.file-list code { word-break: break-all; }
body.lightbox-open { overflow: hidden; }
.lightbox { position: fixed; inset: 0; z-index: 10; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.85); }
.lightbox[hidden] { display: none; }
.lightbox-figure { margin: 0; max-width: calc(100vw - 8rem); max-height: 100vh; text-align: center; color: #fff; }
.lightbox-image { max-width: 100%; max-height: calc(100vh - 6rem); background: #fff; }
.lightbox button { position: absolute; border: 0; border-radius: 50%; width: 3rem; height: 3rem; font-size: 2rem; line-height: 1; color: #fff; background: rgba(255, 255, 255, 0.15); cursor: pointer; }
.lightbox button:disabled { opacity: 0.3; cursor: default; }
.lightbox button:focus-visible { outline: 3px solid #fff; }
.lightbox-close { top: 1rem; right: 1rem; }
.lightbox-prev { left: 1rem; top: 50%; transform: translateY(-50%); }
.lightbox-next { right: 1rem; top: 50%; transform: translateY(-50%); }
.lightbox-counter { margin-left: 1rem; color: #ccc; }
@media (max-width: 600px) {
  main { padding: 0.75rem; }
  .lightbox-figure { max-width: 100vw; }
  .lightbox-prev, .lightbox-next { top: auto; bottom: 1rem; transform: none; }
}
"#;

const LIGHTBOX_MARKUP: &str = r#"<div id="lightbox" class="lightbox" role="dialog" aria-modal="true" aria-label="Image viewer" hidden>
<button type="button" class="lightbox-close" aria-label="Close">&times;</button>
<button type="button" class="lightbox-prev" aria-label="Previous image">&lsaquo;</button>
<figure class="lightbox-figure">
<img class="lightbox-image" alt="">
<figcaption><span class="lightbox-caption"></span><span class="lightbox-counter" aria-live="polite"></span></figcaption>
</figure>
<button type="button" class="lightbox-next" aria-label="Next image">&rsaquo;</button>
</div>
"#;

// Each trigger carries the indices of its neighbors (data-left, data-right,
// data-up, data-down); a missing attribute means there is nowhere to go.
const SCRIPT: &str = r#"
(function () {
  'use strict';
  var triggers = Array.prototype.slice.call(document.querySelectorAll('.lightbox-trigger'));
  var box = document.getElementById('lightbox');
  if (!box || triggers.length === 0) { return; }

  var image = box.querySelector('.lightbox-image');
  var caption = box.querySelector('.lightbox-caption');
  var counter = box.querySelector('.lightbox-counter');
  var closeButton = box.querySelector('.lightbox-close');
  var prevButton = box.querySelector('.lightbox-prev');
  var nextButton = box.querySelector('.lightbox-next');

  var current = -1;
  var opener = null;

  triggers.forEach(function (trigger, index) {
    trigger.addEventListener('click', function () { open(index); });
  });

  function show(index) {
    var trigger = triggers[index];
    var thumb = trigger.querySelector('img');
    current = index;
    image.src = thumb.getAttribute('src');
    image.alt = thumb.getAttribute('alt');
    caption.textContent = trigger.getAttribute('data-caption');
    counter.textContent = (index + 1) + ' / ' + triggers.length;
    prevButton.disabled = !trigger.hasAttribute('data-left');
    nextButton.disabled = !trigger.hasAttribute('data-right');
  }

  function move(direction) {
    if (current < 0) { return; }
    var target = triggers[current].getAttribute('data-' + direction);
    if (target !== null) { show(Number(target)); }
  }

  function open(index) {
    opener = document.activeElement;
    box.hidden = false;
    document.body.classList.add('lightbox-open');
    show(index);
    closeButton.focus();
  }

  function close() {
    box.hidden = true;
    document.body.classList.remove('lightbox-open');
    image.removeAttribute('src');
    current = -1;
    if (opener && opener.focus) { opener.focus(); }
  }

  function trapFocus(event) {
    var focusable = [closeButton, prevButton, nextButton].filter(function (b) { return !b.disabled; });
    var first = focusable[0];
    var last = focusable[focusable.length - 1];
    if (event.shiftKey && document.activeElement === first) {
      last.focus();
      event.preventDefault();
    } else if (!event.shiftKey && document.activeElement === last) {
      first.focus();
      event.preventDefault();
    }
  }

  closeButton.addEventListener('click', close);
  prevButton.addEventListener('click', function () { move('left'); });
  nextButton.addEventListener('click', function () { move('right'); });
  box.addEventListener('click', function (event) {
    if (event.target === box) { close(); }
  });

  document.addEventListener('keydown', function (event) {
    if (box.hidden) { return; }
    switch (event.key) {
      case 'Escape': close(); break;
      case 'ArrowLeft': move('left'); break;
      case 'ArrowRight': move('right'); break;
      case 'ArrowUp': move('up'); break;
      case 'ArrowDown': move('down'); break;
      case 'Tab': trapFocus(event); return;
      default: return;
    }
    event.preventDefault();
  });
})();
"#;

/// Write `index.html`.
///
/// The images it references are written while comparing; this only renders
/// the document.
pub fn write_html_report(
    results: &[ComparisonResult],
    baseline_only: &[ScannedFile],
    candidate_only: &[ScannedFile],
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let html = render_html(results, baseline_only, candidate_only);
    let path = output_dir.join(HTML_REPORT_FILENAME);
    fs::write(&path, html)?;
    debug!("wrote {}", path.display());
    Ok(path)
}

/// Build the HTML document.
#[must_use]
pub fn render_html(
    results: &[ComparisonResult],
    baseline_only: &[ScannedFile],
    candidate_only: &[ScannedFile],
) -> String {
    let summary = RunSummary::new(results, baseline_only, candidate_only);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Visual Diff Report</title>\n");
    let _ = writeln!(html, "<style>{STYLES}</style>");
    html.push_str("</head>\n<body>\n<main>\n<h1>Visual Diff Report</h1>\n");

    let (class, symbol) = if summary.passed { ("status-pass", "✓") } else { ("status-fail", "✗") };
    let _ = writeln!(
        html,
        "<p class=\"status {class}\" role=\"status\"><span aria-hidden=\"true\">{symbol}</span> {}</p>",
        summary.status_text()
    );

    write_summary_table(&mut html, &summary);

    let differences: Vec<&ComparisonResult> = results.iter().filter(|r| r.has_difference).collect();
    if !differences.is_empty() {
        let _ = writeln!(html, "<h2>Differences ({})</h2>", differences.len());
        let widths: Vec<usize> = differences.iter().map(|r| r.image_roles().len()).collect();
        let neighbors = lightbox_neighbors(&widths);
        let mut first = 0;
        for (row, result) in differences.iter().enumerate() {
            write_diff_group(&mut html, row, result, &neighbors[first..first + widths[row]]);
            first += widths[row];
        }
    }

    write_file_list(&mut html, "Removed files", baseline_only.iter().map(|f| f.name.as_str()));
    write_file_list(&mut html, "Added files", candidate_only.iter().map(|f| f.name.as_str()));

    let identical: Vec<&str> = results
        .iter()
        .filter(|r| !r.has_difference)
        .map(|r| r.pair.name())
        .collect();
    if !identical.is_empty() {
        let _ = writeln!(
            html,
            "<details class=\"file-list\">\n<summary>Identical files ({})</summary>\n<ul>",
            identical.len()
        );
        for name in identical {
            let _ = writeln!(html, "<li><code>{}</code></li>", escape_html(name));
        }
        html.push_str("</ul>\n</details>\n");
    }

    html.push_str("</main>\n");
    html.push_str(LIGHTBOX_MARKUP);
    let _ = writeln!(html, "<script>{SCRIPT}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn write_summary_table(html: &mut String, summary: &RunSummary) {
    html.push_str("<table class=\"summary\">\n<caption>Summary</caption>\n<tbody>\n");
    for (label, count) in [
        ("Total images", summary.total),
        ("Different", summary.different),
        ("Removed", summary.removed),
        ("Added", summary.added),
        ("Identical", summary.identical),
    ] {
        let _ = writeln!(html, "<tr><th scope=\"row\">{label}</th><td>{count}</td></tr>");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn write_diff_group(html: &mut String, row: usize, result: &ComparisonResult, neighbors: &[Neighbors]) {
    let name = escape_html(result.pair.name());

    let _ = writeln!(html, "<section class=\"diff-group\" data-row=\"{row}\">");
    let _ = writeln!(
        html,
        "<h3>{name}<span class=\"diff-percentage\">{:.2}%</span></h3>",
        result.diff_percentage
    );
    if let Some(mismatch) = &result.dimension_mismatch {
        let _ = writeln!(
            html,
            "<p class=\"mismatch-note\">⚠️ Dimension mismatch: {} → {}</p>",
            escape_html(&mismatch.baseline),
            escape_html(&mismatch.candidate)
        );
    }

    html.push_str("<div class=\"diff-images\">\n");
    for ((col, role), cell) in result.image_roles().iter().enumerate().zip(neighbors) {
        let label = role.label();
        let alt = format!("{name} — {label}");
        let _ = writeln!(
            html,
            "<figure><button type=\"button\" class=\"lightbox-trigger\" data-row=\"{row}\" data-col=\"{col}\"{} \
             data-caption=\"{alt}\" aria-label=\"View {label} image of {name}\"><img src=\"{}\" alt=\"{alt}\" \
             loading=\"lazy\"></button><figcaption>{label}</figcaption></figure>",
            cell.attributes(),
            escape_html(&result.pair.output_href(*role))
        );
    }
    html.push_str("</div>\n</section>\n");
}

/// Lightbox targets of one trigger, as indices into the document-order list
/// of triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Neighbors {
    left: Option<usize>,
    right: Option<usize>,
    up: Option<usize>,
    down: Option<usize>,
}

impl Neighbors {
    fn attributes(&self) -> String {
        let mut attrs = String::new();
        for (direction, target) in
            [("left", self.left), ("right", self.right), ("up", self.up), ("down", self.down)]
        {
            if let Some(index) = target {
                let _ = write!(attrs, " data-{direction}=\"{index}\"");
            }
        }
        attrs
    }
}

/// Navigation targets for a grid whose rows have the given widths.
///
/// Left/Right stay within a row. Up/Down keep the column, clamped to the
/// target row's last column. Nothing wraps at the edges.
fn lightbox_neighbors(row_widths: &[usize]) -> Vec<Neighbors> {
    let mut row_starts = Vec::with_capacity(row_widths.len());
    let mut next = 0;
    for width in row_widths {
        row_starts.push(next);
        next += width;
    }

    let vertical = |row: usize, col: usize| {
        let width = row_widths[row];
        (width > 0).then(|| row_starts[row] + col.min(width - 1))
    };

    let mut cells = Vec::with_capacity(next);
    for (row, &width) in row_widths.iter().enumerate() {
        for col in 0..width {
            let index = row_starts[row] + col;
            cells.push(Neighbors {
                left: (col > 0).then(|| index - 1),
                right: (col + 1 < width).then_some(index + 1),
                up: row.checked_sub(1).and_then(|above| vertical(above, col)),
                down: (row + 1 < row_widths.len()).then(|| vertical(row + 1, col)).flatten(),
            });
        }
    }
    cells
}

fn write_file_list<'a>(html: &mut String, title: &str, names: impl ExactSizeIterator<Item = &'a str>) {
    if names.len() == 0 {
        return;
    }
    let _ = writeln!(html, "<h2>{title} ({})</h2>\n<ul class=\"file-list\">", names.len());
    for name in names {
        let _ = writeln!(html, "<li><code>{}</code></li>", escape_html(name));
    }
    html.push_str("</ul>\n");
}

/// Escape text for HTML element and attribute content.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summary::tests::{mismatch, result, scanned};

    const TRIGGER: &str = "class=\"lightbox-trigger\"";

    fn group_of(html: &str, row: usize) -> &str {
        let start = html.find(&format!("<section class=\"diff-group\" data-row=\"{row}\">")).unwrap();
        let end = start + html[start..].find("</section>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_writes_index_only() {
        let tmp = tempfile::tempdir().unwrap();

        let results = [result("changed.png", 15.75), result("same.png", 0.0)];

        let path = write_html_report(&results, &[], &[], tmp.path()).unwrap();

        assert_eq!(path, tmp.path().join("index.html"));
        assert!(fs::read_to_string(&path).unwrap().contains("images/changed-baseline.png"));
        assert!(!tmp.path().join("images").exists());
    }

    #[test]
    fn test_summary_counts() {
        let html = render_html(
            &[result("changed.png", 25.5)],
            &[scanned("deleted.png")],
            &[scanned("new.png")],
        );

        assert!(html.contains("Visual Diff Report"));
        assert!(html.contains("<th scope=\"row\">Total images</th><td>3</td>"));
        assert!(html.contains("<th scope=\"row\">Different</th><td>1</td>"));
        assert!(html.contains("<th scope=\"row\">Removed</th><td>1</td>"));
        assert!(html.contains("<th scope=\"row\">Added</th><td>1</td>"));
        assert!(html.contains("<th scope=\"row\">Identical</th><td>0</td>"));
        assert!(html.contains("<code>deleted.png</code>"));
        assert!(html.contains("<code>new.png</code>"));
    }

    #[test]
    fn test_three_triggers_for_difference() {
        let html = render_html(&[result("changed.png", 15.75)], &[], &[]);

        assert!(html.contains("images/changed-baseline.png"));
        assert!(html.contains("images/changed-candidate.png"));
        assert!(html.contains("images/changed-diff.png"));
        assert!(html.contains("15.75%"));
        assert_eq!(group_of(&html, 0).matches(TRIGGER).count(), 3);
        assert_eq!(html.matches(TRIGGER).count(), 3);
    }

    #[test]
    fn test_dimension_mismatch_has_two_triggers() {
        let html = render_html(&[mismatch("mismatched.png")], &[], &[]);

        assert!(html.contains("Dimension mismatch"));
        assert!(html.contains("10x20 → 20x30"));
        let group = group_of(&html, 0);
        assert_eq!(group.matches(TRIGGER).count(), 2);
        assert!(!html.contains("-diff.png"));
        assert!(group.contains("data-col=\"1\""));
        assert!(!group.contains("data-col=\"2\""));
    }

    #[test]
    fn test_fail_status() {
        let html = render_html(&[result("changed.png", 15.75)], &[], &[]);
        assert!(html.contains("status-fail"));
        assert!(html.contains("✗"));
        assert!(html.contains("FAILED"));
    }

    #[test]
    fn test_removed_fails_added_passes() {
        assert!(render_html(&[], &[scanned("gone.png")], &[]).contains("FAILED"));
        assert!(render_html(&[], &[], &[scanned("new.png")]).contains("PASSED"));
    }

    #[test]
    fn test_pass_without_triggers() {
        let html = render_html(&[result("unchanged.png", 0.0)], &[], &[]);
        assert!(html.contains("status-pass"));
        assert!(html.contains("✓"));
        assert!(!html.contains(TRIGGER));
        assert!(!html.contains("class=\"diff-group\""));
        assert!(html.contains("Identical files (1)"));
    }

    #[test]
    fn test_empty_inputs() {
        let html = render_html(&[], &[], &[]);
        assert!(html.contains("PASSED"));
        assert!(html.contains("<th scope=\"row\">Total images</th><td>0</td>"));
        assert!(!html.contains(TRIGGER));
    }

    #[test]
    fn test_grid_rows_follow_result_order() {
        let html = render_html(
            &[result("a.png", 1.0), result("same.png", 0.0), mismatch("b.png"), result("c.png", 2.0)],
            &[],
            &[],
        );

        assert!(group_of(&html, 0).contains("a.png"));
        assert!(group_of(&html, 1).contains("b.png"));
        assert!(group_of(&html, 2).contains("c.png"));
        assert_eq!(html.matches(TRIGGER).count(), 8);
        assert!(html.find("data-row=\"0\"").unwrap() < html.find("data-row=\"1\"").unwrap());
    }

    fn cell(left: Option<usize>, right: Option<usize>, up: Option<usize>, down: Option<usize>) -> Neighbors {
        Neighbors { left, right, up, down }
    }

    #[test]
    fn test_lightbox_neighbors_stay_in_row() {
        let cells = lightbox_neighbors(&[3]);
        assert_eq!(
            cells,
            vec![
                cell(None, Some(1), None, None),
                cell(Some(0), Some(2), None, None),
                cell(Some(1), None, None, None),
            ]
        );
    }

    #[test]
    fn test_lightbox_neighbors_clamp_column() {
        // rows: [0 1 2] [3 4] [5 6 7]
        let cells = lightbox_neighbors(&[3, 2, 3]);

        // diff column drops to the last column of the shorter row
        assert_eq!(cells[2].down, Some(4));
        assert_eq!(cells[7].up, Some(4));
        // and comes back as the candidate column, not the diff column
        assert_eq!(cells[4].down, Some(6));
        assert_eq!(cells[4].up, Some(1));
        assert_eq!(cells[3].up, Some(0));
        assert_eq!(cells[3].down, Some(5));
    }

    #[test]
    fn test_lightbox_neighbors_do_not_wrap() {
        let cells = lightbox_neighbors(&[2, 3]);
        assert_eq!(cells[0].up, None);
        assert_eq!(cells[0].left, None);
        assert_eq!(cells[1].right, None);
        assert_eq!(cells[4].down, None);
        assert_eq!(cells[4].right, None);
        assert_eq!(cells[2].left, None);
    }

    #[test]
    fn test_lightbox_neighbors_empty() {
        assert!(lightbox_neighbors(&[]).is_empty());
    }

    #[test]
    fn test_triggers_carry_navigation_targets() {
        let html = render_html(&[result("a.png", 1.0), mismatch("b.png")], &[], &[]);

        let first = group_of(&html, 0);
        assert!(first.contains("data-col=\"0\" data-right=\"1\" data-down=\"3\" data-caption"));
        assert!(first.contains("data-col=\"2\" data-left=\"1\" data-down=\"4\" data-caption"));

        let second = group_of(&html, 1);
        assert!(second.contains("data-col=\"1\" data-left=\"3\" data-up=\"1\" data-caption"));
        assert!(!second.contains("data-down"));
        assert!(html.contains("getAttribute('data-' + direction)"));
    }

    #[test]
    fn test_lightbox_accessibility() {
        let html = render_html(&[result("changed.png", 1.0)], &[], &[]);
        assert!(html.contains("role=\"dialog\""));
        assert!(html.contains("aria-label=\"Image viewer\""));
        assert!(html.contains("aria-label=\"Close\""));
        assert!(html.contains("aria-label=\"Previous image\""));
        assert!(html.contains("aria-label=\"Next image\""));
        assert!(html.contains("ArrowUp"));
        assert!(html.contains("ArrowDown"));
    }

    #[test]
    fn test_self_contained() {
        let html = render_html(&[result("changed.png", 1.0)], &[scanned("x.png")], &[]);
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script src"));
    }

    #[test]
    fn test_escapes_names() {
        let html = render_html(&[], &[scanned("<b>&\".png")], &[]);
        assert!(html.contains("<code>&lt;b&gt;&amp;&quot;.png</code>"));
        assert!(!html.contains("<b>&"));
    }

    #[test]
    fn test_deterministic() {
        let results = vec![result("a.png", 1.0), mismatch("b.png")];
        assert_eq!(render_html(&results, &[], &[]), render_html(&results, &[], &[]));
    }
}
