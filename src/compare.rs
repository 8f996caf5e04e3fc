//! Per-pixel comparison of a loaded pair.
//!
//! Pixels are compared with the YIQ color delta popularized by pixelmatch:
//! both pixels are blended over white, converted to YIQ, and the weighted
//! squared distance is tested against `35215 * threshold²` (35215 being the
//! maximum possible delta).

use imgref::ImgVec;
use log::{debug, warn};
use rgb::RGBA8;
use serde::Serialize;

use crate::error::Result;
use crate::pair::{write_png, DimensionMismatch, ImageRole, LoadedPair, PairInfo};

/// Maximum possible YIQ delta between two pixels.
const MAX_YIQ_DELTA: f64 = 35215.0;

/// Highlight color for differing pixels in the diff image.
const DIFF_COLOR: RGBA8 = RGBA8 { r: 255, g: 0, b: 0, a: 255 };

/// Opacity of the faded baseline behind highlighted pixels.
const FADE_ALPHA: f64 = 0.1;

/// Outcome of comparing one pair.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// Name, dimensions and report image locations of the compared pair.
    pub pair: PairInfo,
    /// Whether any pixel differs (always true for dimension mismatches).
    pub has_difference: bool,
    /// Share of differing pixels, 0-100. Unrounded.
    pub diff_percentage: f64,
    /// Literal dimensions when the two images differ in size.
    pub dimension_mismatch: Option<DimensionMismatch>,
}

impl ComparisonResult {
    /// Whether a diff image exists for this result.
    #[must_use]
    pub fn has_diff_image(&self) -> bool {
        self.has_difference && self.dimension_mismatch.is_none()
    }

    /// Image roles shown in the report for this result, in display order.
    #[must_use]
    pub fn image_roles(&self) -> &'static [ImageRole] {
        if self.has_diff_image() {
            &[ImageRole::Baseline, ImageRole::Candidate, ImageRole::Diff]
        } else {
            &[ImageRole::Baseline, ImageRole::Candidate]
        }
    }
}

/// Pixel counts from a raster comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelDiff {
    /// Pixels whose delta exceeds the threshold.
    pub differing: usize,
    /// Pixels compared.
    pub total: usize,
}

impl PixelDiff {
    /// Share of differing pixels, 0-100.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.differing as f64 / self.total as f64 * 100.0
        }
    }
}

/// Compares pairs and writes diff images.
#[derive(Debug, Clone, Copy)]
pub struct ImageComparer {
    threshold: f64,
}

impl ImageComparer {
    /// Create a comparer with a color tolerance in `[0, 1]`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Compare a pair, writing its diff image when pixels differ.
    pub fn compare(&self, pair: &LoadedPair) -> Result<ComparisonResult> {
        if let Some(mismatch) = pair.dimension_mismatch() {
            warn!(
                "{}: dimension mismatch ({} → {})",
                pair.name(),
                mismatch.baseline,
                mismatch.candidate
            );
            return Ok(ComparisonResult {
                pair: pair.info(),
                has_difference: true,
                diff_percentage: 100.0,
                dimension_mismatch: Some(mismatch),
            });
        }

        let (diff, diff_image) = self.diff_rasters(pair.baseline(), pair.candidate());
        let has_difference = diff.differing > 0;

        if has_difference {
            write_png(&pair.output_path(ImageRole::Diff), &diff_image)?;
        }

        debug!(
            "{}: {}/{} pixels differ ({:.4}%)",
            pair.name(),
            diff.differing,
            diff.total,
            diff.percentage()
        );

        Ok(ComparisonResult {
            pair: pair.info(),
            has_difference,
            diff_percentage: diff.percentage(),
            dimension_mismatch: None,
        })
    }

    /// Count differing pixels between two equally sized rasters and build
    /// the visualization.
    #[must_use]
    pub fn diff_rasters(
        &self,
        baseline: &ImgVec<RGBA8>,
        candidate: &ImgVec<RGBA8>,
    ) -> (PixelDiff, ImgVec<RGBA8>) {
        let width = baseline.width();
        let height = baseline.height();
        let max_delta = MAX_YIQ_DELTA * self.threshold * self.threshold;

        let mut differing = 0;
        let mut out = Vec::with_capacity(width * height);

        for (a, b) in baseline.pixels().zip(candidate.pixels()) {
            if a != b && color_delta(a, b) > max_delta {
                differing += 1;
                out.push(DIFF_COLOR);
            } else {
                out.push(faded_gray(a));
            }
        }

        (
            PixelDiff {
                differing,
                total: width * height,
            },
            ImgVec::new(out, width, height),
        )
    }
}

/// Squared YIQ distance between two pixels blended over white.
fn color_delta(a: RGBA8, b: RGBA8) -> f64 {
    let (r1, g1, b1) = blend_over_white(a);
    let (r2, g2, b2) = blend_over_white(b);

    let y = rgb_to_y(r1, g1, b1) - rgb_to_y(r2, g2, b2);
    let i = rgb_to_i(r1, g1, b1) - rgb_to_i(r2, g2, b2);
    let q = rgb_to_q(r1, g1, b1) - rgb_to_q(r2, g2, b2);

    0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q
}

fn blend_over_white(p: RGBA8) -> (f64, f64, f64) {
    let alpha = f64::from(p.a) / 255.0;
    let blend = |c: u8| 255.0 + (f64::from(c) - 255.0) * alpha;
    (blend(p.r), blend(p.g), blend(p.b))
}

fn rgb_to_y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb_to_i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb_to_q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

/// Baseline luma faded toward white.
fn faded_gray(p: RGBA8) -> RGBA8 {
    let (r, g, b) = blend_over_white(p);
    let y = rgb_to_y(r, g, b);
    let v = (255.0 + (y - 255.0) * FADE_ALPHA).round().clamp(0.0, 255.0) as u8;
    RGBA8::new(v, v, v, 255)
}
