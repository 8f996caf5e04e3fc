//! Eager loading of baseline/candidate image pairs.
//!
//! A [`LoadedPair`] decodes both files at construction time, so a corrupt or
//! missing screenshot fails before any report work starts. Dimensions and
//! mismatch are derived from the two decoded rasters; output locations come
//! from the run-unique stem assigned when the pair was scanned.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageFormat};
use imgref::ImgVec;
use rgb::RGBA8;
use serde::Serialize;

use crate::config::IMAGES_DIR;
use crate::error::{Error, Result};
use crate::scan::FilePair;

/// Role of an image written for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    /// Reference screenshot.
    Baseline,
    /// New screenshot under evaluation.
    Candidate,
    /// Highlighted per-pixel difference.
    Diff,
}

impl ImageRole {
    /// Suffix appended to the sanitized pair name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Candidate => "candidate",
            Self::Diff => "diff",
        }
    }

    /// Human-readable label used in captions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::Candidate => "Candidate",
            Self::Diff => "Diff",
        }
    }
}

/// Literal `WxH` dimensions of a mismatched pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionMismatch {
    /// Baseline dimensions, e.g. `"10x20"`.
    pub baseline: String,
    /// Candidate dimensions, e.g. `"20x30"`.
    pub candidate: String,
}

impl DimensionMismatch {
    /// Build from `(width, height)` tuples.
    #[must_use]
    pub fn new(baseline: (usize, usize), candidate: (usize, usize)) -> Self {
        Self {
            baseline: format!("{}x{}", baseline.0, baseline.1),
            candidate: format!("{}x{}", candidate.0, candidate.1),
        }
    }
}

/// A matched pair with both images decoded into memory.
///
/// Rasters live only as long as the comparison of this pair; results keep a
/// [`PairInfo`] instead.
#[derive(Clone)]
pub struct LoadedPair {
    name: String,
    output_stem: String,
    output_dir: PathBuf,
    baseline: ImgVec<RGBA8>,
    candidate: ImgVec<RGBA8>,
}

impl std::fmt::Debug for LoadedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPair")
            .field("name", &self.name)
            .field("output_stem", &self.output_stem)
            .field("output_dir", &self.output_dir)
            .field("baseline", &self.baseline_dimensions())
            .field("candidate", &self.candidate_dimensions())
            .finish()
    }
}

impl LoadedPair {
    /// Decode both files of a scanned pair.
    ///
    /// Fails if either file cannot be read or is not a valid PNG.
    pub fn load(pair: &FilePair, output_dir: &Path) -> Result<Self> {
        let baseline = decode_png(&pair.baseline_path)?;
        let candidate = decode_png(&pair.candidate_path)?;
        Ok(Self {
            name: pair.name.clone(),
            output_stem: pair.output_stem.clone(),
            output_dir: output_dir.to_path_buf(),
            baseline,
            candidate,
        })
    }

    /// Build a pair from already-decoded rasters, deriving the output stem
    /// from the name alone.
    pub fn from_images(
        name: impl Into<String>,
        baseline: ImgVec<RGBA8>,
        candidate: ImgVec<RGBA8>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let name = name.into();
        Self {
            output_stem: output_stem(&name),
            name,
            output_dir: output_dir.into(),
            baseline,
            candidate,
        }
    }

    /// Pair name (the shared file name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the baseline image.
    #[must_use]
    pub fn width(&self) -> usize {
        self.baseline.width()
    }

    /// Height of the baseline image.
    #[must_use]
    pub fn height(&self) -> usize {
        self.baseline.height()
    }

    #[must_use]
    pub fn baseline_dimensions(&self) -> (usize, usize) {
        (self.baseline.width(), self.baseline.height())
    }

    #[must_use]
    pub fn candidate_dimensions(&self) -> (usize, usize) {
        (self.candidate.width(), self.candidate.height())
    }

    /// Decoded baseline raster.
    #[must_use]
    pub fn baseline(&self) -> &ImgVec<RGBA8> {
        &self.baseline
    }

    /// Decoded candidate raster.
    #[must_use]
    pub fn candidate(&self) -> &ImgVec<RGBA8> {
        &self.candidate
    }

    #[must_use]
    pub fn has_dimension_mismatch(&self) -> bool {
        self.baseline_dimensions() != self.candidate_dimensions()
    }

    /// The literal dimensions of both sides, if they differ.
    #[must_use]
    pub fn dimension_mismatch(&self) -> Option<DimensionMismatch> {
        self.has_dimension_mismatch()
            .then(|| DimensionMismatch::new(self.baseline_dimensions(), self.candidate_dimensions()))
    }

    /// Absolute location of the report image for `role`.
    #[must_use]
    pub fn output_path(&self, role: ImageRole) -> PathBuf {
        image_path(&self.output_dir, &self.output_stem, role)
    }

    /// Write the baseline and candidate rasters to their report locations.
    pub fn write_sources(&self) -> Result<()> {
        write_png(&self.output_path(ImageRole::Baseline), &self.baseline)?;
        write_png(&self.output_path(ImageRole::Candidate), &self.candidate)
    }

    /// Everything the reports need about this pair, without pixel data.
    #[must_use]
    pub fn info(&self) -> PairInfo {
        PairInfo {
            name: self.name.clone(),
            output_stem: self.output_stem.clone(),
            output_dir: self.output_dir.clone(),
            baseline_dimensions: self.baseline_dimensions(),
            candidate_dimensions: self.candidate_dimensions(),
        }
    }
}

/// Name, dimensions and report image locations of a compared pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairInfo {
    name: String,
    output_stem: String,
    output_dir: PathBuf,
    baseline_dimensions: (usize, usize),
    candidate_dimensions: (usize, usize),
}

impl PairInfo {
    /// Pair name (the shared file name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the baseline image.
    #[must_use]
    pub fn width(&self) -> usize {
        self.baseline_dimensions.0
    }

    /// Height of the baseline image.
    #[must_use]
    pub fn height(&self) -> usize {
        self.baseline_dimensions.1
    }

    #[must_use]
    pub fn baseline_dimensions(&self) -> (usize, usize) {
        self.baseline_dimensions
    }

    #[must_use]
    pub fn candidate_dimensions(&self) -> (usize, usize) {
        self.candidate_dimensions
    }

    /// File-system safe stem, unique within its run.
    #[must_use]
    pub fn output_stem(&self) -> &str {
        &self.output_stem
    }

    /// File name of the report image for `role`, e.g. `home-diff.png`.
    #[must_use]
    pub fn output_file_name(&self, role: ImageRole) -> String {
        image_file_name(&self.output_stem, role)
    }

    /// Absolute location of the report image for `role`.
    #[must_use]
    pub fn output_path(&self, role: ImageRole) -> PathBuf {
        image_path(&self.output_dir, &self.output_stem, role)
    }

    /// Document-relative reference to the report image for `role`.
    #[must_use]
    pub fn output_href(&self, role: ImageRole) -> String {
        format!("{IMAGES_DIR}/{}", self.output_file_name(role))
    }
}

fn image_file_name(stem: &str, role: ImageRole) -> String {
    format!("{stem}-{}.png", role.suffix())
}

fn image_path(output_dir: &Path, stem: &str, role: ImageRole) -> PathBuf {
    output_dir.join(IMAGES_DIR).join(image_file_name(stem, role))
}

/// Strip a trailing `.png` and replace anything outside `[A-Za-z0-9._-]`.
///
/// Distinct names can sanitize to the same stem; see [`unique_output_stems`].
#[must_use]
pub fn output_stem(name: &str) -> String {
    let base = match name.len().checked_sub(4) {
        Some(split) if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".png") => {
            &name[..split]
        }
        _ => name,
    };

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Output stems for a sorted list of pair names, one per name, no two equal.
///
/// The first name to claim a sanitized stem keeps it; later names that
/// sanitize to the same stem get `-2`, `-3`, ... appended, skipping any
/// suffixed form that is itself some other name's stem. Stems are compared
/// ASCII case-insensitively so they stay distinct on case-folding file
/// systems.
#[must_use]
pub fn unique_output_stems<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let bases: Vec<String> = names.into_iter().map(output_stem).collect();
    let reserved: HashSet<String> = bases.iter().map(|b| b.to_ascii_lowercase()).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(bases.len());

    bases
        .into_iter()
        .map(|base| {
            if taken.insert(base.to_ascii_lowercase()) {
                return base;
            }
            let mut n = 2;
            loop {
                let stem = format!("{base}-{n}");
                let key = stem.to_ascii_lowercase();
                if !reserved.contains(&key) && taken.insert(key) {
                    return stem;
                }
                n += 1;
            }
        })
        .collect()
}

/// Read and decode a PNG file into an RGBA8 raster.
pub fn decode_png(path: &Path) -> Result<ImgVec<RGBA8>> {
    let data = fs::read(path).map_err(|e| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let decoded = image::load_from_memory_with_format(&data, ImageFormat::Png)
        .map_err(|e| Error::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .to_rgba8();

    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    let pixels: Vec<RGBA8> = decoded
        .as_raw()
        .chunks_exact(4)
        .map(|c| RGBA8::new(c[0], c[1], c[2], c[3]))
        .collect();

    Ok(ImgVec::new(pixels, width, height))
}

/// Encode an RGBA8 raster as PNG, creating parent directories as needed.
pub fn write_png(path: &Path, raster: &ImgVec<RGBA8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes: Vec<u8> = raster.pixels().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();

    image::save_buffer_with_format(
        path,
        &bytes,
        raster.width() as u32,
        raster.height() as u32,
        ExtendedColorType::Rgba8,
        ImageFormat::Png,
    )
    .map_err(|e| Error::ImageWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
