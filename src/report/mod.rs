//! Report rendering.
//!
//! Both renderers consume the same fully materialized result set:
//!
//! - [`html`]: self-contained interactive document with a lightbox viewer
//! - [`markdown`]: bounded summary for pull-request comments
//! - [`summary`]: derived counts and the pass/fail verdict

pub mod html;
pub mod markdown;
pub mod summary;

pub use html::{render_html, write_html_report};
pub use markdown::{render_markdown, write_markdown_report};
pub use summary::RunSummary;
