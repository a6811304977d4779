//! End-to-end runs: extraction → selection → quadrilateral.
//!
//! The grid-level entry points take already-decoded inputs (a slice of
//! lines, a grayscale image) and are the programmatic equivalents of the
//! CLI subcommands. The `*_file` conveniences add the input reading and
//! map failures to [`Error::InputUnreadable`].

use std::path::Path;

use image::GrayImage;

use crate::error::Error;
use crate::geometry::Quadrilateral;
use crate::patch::{find_bright_patches, PatchParams};
use crate::text::{find_text_windows, SelectedWindow, TextParams};

/// A selected image patch in the final report.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectedPatch {
    /// Patch center (row, col), the geometry point.
    pub center: [u32; 2],
    /// Top-left corner (row, col).
    pub top_left: [u32; 2],
    /// Mean grayscale intensity over the patch.
    pub mean_brightness: f32,
}

/// Result of a text run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextReport {
    /// Selected windows, highest score first.
    pub windows: Vec<SelectedWindow>,
    /// Quadrilateral over the window positions; present iff exactly
    /// four windows were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quad: Option<Quadrilateral>,
    /// Number of input lines scanned.
    pub lines_scanned: usize,
}

/// Result of an image run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageReport {
    /// Selected patches, brightest first.
    pub patches: Vec<SelectedPatch>,
    /// Quadrilateral over the patch centers; present iff exactly four
    /// patches were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quad: Option<Quadrilateral>,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
}

/// Quadrilateral over the points, when there are exactly four of them.
fn quad_of(points: &[[f64; 2]]) -> Option<Quadrilateral> {
    match points {
        &[a, b, c, d] => Some(Quadrilateral::from_points([a, b, c, d])),
        _ => None,
    }
}

/// Find the top lexicographic windows across `lines` and measure the
/// quadrilateral their positions form.
pub fn find_text_quadrilateral<S: AsRef<str> + Sync>(
    lines: &[S],
    params: &TextParams,
) -> Result<TextReport, Error> {
    let windows = find_text_windows(lines, params)?;
    let points: Vec<[f64; 2]> = windows.iter().map(SelectedWindow::point).collect();
    let quad = quad_of(&points);

    if let Some(ref q) = quad {
        tracing::info!(
            "text quadrilateral: area={:.3}, perimeter={:.3}",
            q.area,
            q.perimeter
        );
    }

    Ok(TextReport {
        windows,
        quad,
        lines_scanned: lines.len(),
    })
}

/// Find the brightest patches in `gray` and measure the quadrilateral
/// their centers form.
pub fn find_patch_quadrilateral(
    gray: &GrayImage,
    params: &PatchParams,
) -> Result<ImageReport, Error> {
    let blocks = find_bright_patches(gray, params)?;
    let points: Vec<[f64; 2]> = blocks.iter().map(|b| b.point()).collect();
    let quad = quad_of(&points);

    if let Some(ref q) = quad {
        tracing::info!(
            "patch quadrilateral: area={:.3}, perimeter={:.3}",
            q.area,
            q.perimeter
        );
    }

    Ok(ImageReport {
        patches: blocks
            .iter()
            .map(|b| SelectedPatch {
                center: b.center(),
                top_left: [b.row, b.col],
                mean_brightness: b.mean(),
            })
            .collect(),
        quad,
        image_size: [gray.width(), gray.height()],
    })
}

/// Read a UTF-8 text file and run the text pipeline on its lines.
pub fn detect_text_file(path: &Path, params: &TextParams) -> Result<TextReport, Error> {
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::unreadable(path, e))?;
    let lines: Vec<&str> = content.lines().collect();
    find_text_quadrilateral(&lines, params)
}

/// Decode an image file to grayscale and run the patch pipeline on it.
pub fn detect_image_file(path: &Path, params: &PatchParams) -> Result<ImageReport, Error> {
    let img = image::open(path).map_err(|e| Error::unreadable(path, e))?;
    find_patch_quadrilateral(&img.to_luma8(), params)
}
