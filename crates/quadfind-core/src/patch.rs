//! Brightest-patch extraction over a grayscale image.
//!
//! A candidate is a square block fully inside the image, scored by its
//! mean intensity. Block sums come from a zero-padded integral image
//! computed once per run, so each window costs O(1) regardless of patch
//! size. Equal-size blocks order the same by sum as by mean, so the raw
//! integer sum is the comparison key and stays exact.
//!
//! The top-left row range is split into bands processed in parallel;
//! a band reads up to `size - 1` rows past its end through the shared
//! integral table, so no window spanning a band seam is missed and no
//! window is emitted twice. Each band keeps a small bounded buffer of
//! its best blocks and a single merge pass selects the global winners.

use std::cmp::Ordering;

use image::GrayImage;
use rayon::prelude::*;

use crate::candidate::{Candidate, TopKBuffer};
use crate::error::Error;
use crate::select;

/// Parameters for bright-patch extraction.
#[derive(Debug, Clone)]
pub struct PatchParams {
    /// Side length of the square patch in pixels.
    pub patch_size: u32,
    /// Number of non-overlapping patches to select.
    pub count: usize,
    /// Top-left rows per parallel band.
    pub rows_per_band: u32,
}

impl Default for PatchParams {
    fn default() -> Self {
        Self {
            patch_size: 5,
            count: 4,
            rows_per_band: 256,
        }
    }
}

impl PatchParams {
    /// Lossless per-band buffer size: one accepted block overlaps at most
    /// `(2 * size - 1)^2` blocks, itself included.
    fn buffer_cap(&self) -> usize {
        let conflicts = (2 * self.patch_size as usize).saturating_sub(1).pow(2);
        self.count * conflicts.max(1)
    }
}

/// A square pixel block scored by total intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchBlock {
    /// Top-left pixel row.
    pub row: u32,
    /// Top-left pixel column.
    pub col: u32,
    /// Side length in pixels.
    pub size: u32,
    /// Sum of intensities over the block.
    pub sum: u64,
}

impl PatchBlock {
    /// Mean intensity over the block.
    pub fn mean(&self) -> f32 {
        self.sum as f32 / (self.size * self.size) as f32
    }

    /// Block center (row, col), the point used for geometry.
    pub fn center(&self) -> [u32; 2] {
        [self.row + self.size / 2, self.col + self.size / 2]
    }

    /// Center as a plane point: x = center row, y = center column.
    pub fn point(&self) -> [f64; 2] {
        let c = self.center();
        [c[0] as f64, c[1] as f64]
    }
}

impl Candidate for PatchBlock {
    fn cmp_priority(&self, other: &Self) -> Ordering {
        other
            .sum
            .cmp(&self.sum)
            .then_with(|| self.row.cmp(&other.row))
            .then_with(|| self.col.cmp(&other.col))
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.row < other.row + other.size
            && other.row < self.row + self.size
            && self.col < other.col + other.size
            && other.col < self.col + self.size
    }
}

/// Zero-padded summed-area table: `table[(y + 1) * stride + (x + 1)]`
/// holds the sum of all pixels in `[0, x] x [0, y]`, with a zero first
/// row and column so lookups need no boundary branches.
fn integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum = 0u64;
        let above = y as usize * stride;
        let current = (y + 1) as usize * stride;
        for x in 0..w {
            row_sum += gray.get_pixel(x, y)[0] as u64;
            table[current + x as usize + 1] = table[above + x as usize + 1] + row_sum;
        }
    }
    table
}

/// Intensity sum of the `size x size` block anchored at `(row, col)`.
#[inline]
fn block_sum(table: &[u64], stride: usize, row: u32, col: u32, size: u32) -> u64 {
    let r0 = row as usize;
    let c0 = col as usize;
    let r1 = r0 + size as usize;
    let c1 = c0 + size as usize;
    table[r1 * stride + c1] + table[r0 * stride + c0]
        - table[r0 * stride + c1]
        - table[r1 * stride + c0]
}

/// Stream one band of top-left rows into a bounded buffer.
///
/// Unlike text chunks, blocks from adjacent bands can overlap across the
/// seam, so no greedy selection runs here: a band-local acceptance could
/// mask a block the global scan keeps. The buffer instead retains every
/// candidate the global priority scan could possibly visit before its
/// last acceptance (see [`TopKBuffer`]), and the merge decides.
fn extract_band(
    table: &[u64],
    stride: usize,
    rows: std::ops::Range<u32>,
    max_col: u32,
    params: &PatchParams,
) -> Vec<PatchBlock> {
    let mut buf = TopKBuffer::new(params.buffer_cap());
    for row in rows {
        for col in 0..=max_col {
            buf.push(PatchBlock {
                row,
                col,
                size: params.patch_size,
                sum: block_sum(table, stride, row, col, params.patch_size),
            });
        }
    }
    buf.into_sorted()
}

/// Select the `count` brightest pairwise-disjoint patches in the image.
pub fn find_bright_patches(
    gray: &GrayImage,
    params: &PatchParams,
) -> Result<Vec<PatchBlock>, Error> {
    let (w, h) = gray.dimensions();
    let size = params.patch_size;
    if size == 0 || w < size || h < size {
        return Err(Error::InsufficientCandidates {
            found: 0,
            needed: params.count,
        });
    }

    let table = integral_image(gray);
    let stride = (w + 1) as usize;
    let max_row = h - size;
    let max_col = w - size;

    let band = params.rows_per_band.max(1);
    let bands: Vec<std::ops::Range<u32>> = (0..=max_row)
        .step_by(band as usize)
        .map(|r0| r0..(r0 + band).min(max_row + 1))
        .collect();

    let locals: Vec<PatchBlock> = bands
        .into_par_iter()
        .flat_map_iter(|rows| extract_band(&table, stride, rows, max_col, params))
        .collect();

    tracing::debug!(
        "patch extraction: {} local winner(s) from a {}x{} image",
        locals.len(),
        w,
        h
    );

    select::select_exactly(locals, params.count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::image_with_blocks;

    #[test]
    fn integral_matches_naive_sums() {
        let img = image_with_blocks(12, 9, 3, &[(1, 2, 200), (4, 7, 90)], 17);
        let table = integral_image(&img);
        let stride = (img.width() + 1) as usize;

        for row in 0..=(img.height() - 4) {
            for col in 0..=(img.width() - 4) {
                let mut naive = 0u64;
                for dy in 0..4 {
                    for dx in 0..4 {
                        naive += img.get_pixel(col + dx, row + dy)[0] as u64;
                    }
                }
                assert_eq!(block_sum(&table, stride, row, col, 4), naive);
            }
        }
    }

    #[test]
    fn brightest_disjoint_blocks_form_known_square() {
        // Four 5x5 blocks with means 200/180/150/100 centered at
        // (2,2), (2,20), (20,2), (20,20) on a dark background.
        let img = image_with_blocks(
            32,
            32,
            5,
            &[(0, 0, 200), (0, 18, 180), (18, 0, 150), (18, 18, 100)],
            10,
        );
        let got = find_bright_patches(&img, &PatchParams::default()).unwrap();

        assert_eq!(got.len(), 4);
        assert_eq!(got[0].center(), [2, 2]);
        assert_eq!(got[1].center(), [2, 20]);
        assert_eq!(got[2].center(), [20, 2]);
        assert_eq!(got[3].center(), [20, 20]);
        assert!((got[0].mean() - 200.0).abs() < 1e-6);
        assert!((got[3].mean() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn selected_blocks_are_pairwise_disjoint() {
        let img = image_with_blocks(40, 40, 5, &[(3, 3, 250), (5, 5, 240)], 60);
        let got = find_bright_patches(&img, &PatchParams::default()).unwrap();
        for i in 0..got.len() {
            for j in (i + 1)..got.len() {
                assert!(!got[i].overlaps(&got[j]), "{:?} vs {:?}", got[i], got[j]);
            }
        }
    }

    #[test]
    fn banding_does_not_change_the_result() {
        let img = image_with_blocks(
            64,
            48,
            5,
            &[(2, 2, 220), (9, 30, 210), (30, 9, 205), (40, 40, 199)],
            35,
        );
        let wide = PatchParams::default();
        let narrow = PatchParams {
            rows_per_band: 3,
            ..PatchParams::default()
        };
        assert_eq!(
            find_bright_patches(&img, &wide).unwrap(),
            find_bright_patches(&img, &narrow).unwrap()
        );
    }

    #[test]
    fn equal_brightness_breaks_ties_by_position() {
        // Uniform image: every block has the same sum.
        let img = image_with_blocks(20, 20, 5, &[], 128);
        let got = find_bright_patches(&img, &PatchParams::default()).unwrap();
        assert_eq!((got[0].row, got[0].col), (0, 0));
        assert_eq!((got[1].row, got[1].col), (0, 5));
        assert_eq!((got[2].row, got[2].col), (0, 10));
        assert_eq!((got[3].row, got[3].col), (0, 15));
    }

    #[test]
    fn too_small_image_is_insufficient() {
        let img = image_with_blocks(4, 4, 1, &[], 0);
        let err = find_bright_patches(&img, &PatchParams::default()).unwrap_err();
        match err {
            Error::InsufficientCandidates { found, needed } => {
                assert_eq!(found, 0);
                assert_eq!(needed, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn image_fitting_fewer_blocks_reports_shortfall() {
        // 9x5 image: anchors exist, but only one disjoint 5x5 block fits.
        let img = image_with_blocks(9, 5, 1, &[], 100);
        let err = find_bright_patches(&img, &PatchParams::default()).unwrap_err();
        match err {
            Error::InsufficientCandidates { found, needed } => {
                assert_eq!(found, 1);
                assert_eq!(needed, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
