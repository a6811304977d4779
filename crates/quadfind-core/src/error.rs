//! Error taxonomy for extraction and selection failures.

use std::path::PathBuf;

/// Failures surfaced by the extraction/selection pipeline.
///
/// Degenerate geometry (four collinear points) is deliberately absent:
/// a zero-area quadrilateral is a valid result, not an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be read or decoded. Fatal; no retry.
    #[error("cannot read input {path}: {reason}")]
    InputUnreadable {
        /// Path of the offending input.
        path: PathBuf,
        /// Decoder/filesystem message.
        reason: String,
    },

    /// The domain holds fewer pairwise-disjoint candidates than requested.
    #[error("found {found} non-overlapping candidate(s), {needed} required")]
    InsufficientCandidates {
        /// Disjoint candidates actually available.
        found: usize,
        /// Requested selection size.
        needed: usize,
    },
}

impl Error {
    /// Build an [`Error::InputUnreadable`] from any decoder/IO failure.
    pub fn unreadable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::InputUnreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
