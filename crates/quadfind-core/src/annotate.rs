//! Draw the selected quadrilateral onto an RGB copy of the input image.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::geometry::Quadrilateral;

/// Outline color for the quadrilateral edges.
const EDGE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw the quadrilateral outline in red.
///
/// Vertices are (row, col) plane points; drawing swaps them into the
/// image's (x = col, y = row) convention. Small images get a 2 px
/// outline so it stays visible, larger ones 1 px.
pub fn draw_quadrilateral(img: &mut RgbImage, quad: &Quadrilateral) {
    let thickness: u32 = if img.height() > 300 { 1 } else { 2 };

    for i in 0..4 {
        let a = quad.vertices[i];
        let b = quad.vertices[(i + 1) % 4];
        for t in 0..thickness {
            // Thicker strokes are parallel 1 px segments offset diagonally.
            let off = t as f32;
            draw_line_segment_mut(
                img,
                (a[1] as f32 + off, a[0] as f32 + off),
                (b[1] as f32 + off, b[0] as f32 + off),
                EDGE_COLOR,
            );
        }
    }
}
