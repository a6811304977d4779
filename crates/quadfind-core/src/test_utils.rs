//! Shared synthetic-input builders for unit tests.

use image::{GrayImage, Luma};

/// Render a `w x h` image filled with `background`, then paint square
/// `block x block` regions of the given intensity at each `(row, col)`
/// top-left anchor.
pub(crate) fn image_with_blocks(
    w: u32,
    h: u32,
    block: u32,
    anchors: &[(u32, u32, u8)],
    background: u8,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([background]));
    for &(row, col, value) in anchors {
        for dy in 0..block {
            for dx in 0..block {
                let (x, y) = (col + dx, row + dy);
                if x < w && y < h {
                    img.put_pixel(x, y, Luma([value]));
                }
            }
        }
    }
    img
}
