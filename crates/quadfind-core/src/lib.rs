//! quadfind-core — top-K non-overlapping feature selection and
//! quadrilateral geometry over text corpora and grayscale images.
//!
//! The pipeline stages are:
//!
//! 1. **Extract** – domain-specific candidate generation: length-N
//!    strictly alphanumeric windows per text line, or N×N pixel blocks
//!    scored by mean brightness.
//! 2. **Select** – domain-agnostic greedy top-K over the candidate
//!    priority order, keeping only pairwise-disjoint spans with a
//!    deterministic position tie-break.
//! 3. **Geometry** – the four winning positions, rewound into canonical
//!    centroid-angle order, yield the quadrilateral's area and perimeter.
//!
//! Extraction runs over independent partitions (line chunks, image row
//! bands) in parallel; each partition keeps a small bounded set of local
//! winners and a single merge pass selects the global result, so the
//! merge cost is independent of the input size.

pub mod annotate;
pub mod candidate;
pub mod error;
pub mod geometry;
pub mod patch;
pub mod pipeline;
pub mod select;
pub mod text;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::Error;
pub use geometry::Quadrilateral;
pub use patch::{find_bright_patches, PatchBlock, PatchParams};
pub use pipeline::{
    detect_image_file, detect_text_file, find_patch_quadrilateral, find_text_quadrilateral,
    ImageReport, SelectedPatch, TextReport,
};
pub use select::{select_disjoint, select_exactly};
pub use text::{find_text_windows, SelectedWindow, TextParams};
