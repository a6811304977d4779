//! Lexicographic window extraction over text lines.
//!
//! A candidate is a fixed-length window of strictly ASCII-alphanumeric
//! bytes contained in a single line; its score is the window text under
//! byte-lexicographic order (equal to codepoint order on ASCII). Windows
//! never cross lines, so overlap only exists between windows of the same
//! line.
//!
//! Lines are partitioned into chunks processed in parallel; each chunk
//! keeps only its local winners and a single merge pass selects the
//! global result from the union of local winners.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::candidate::{Candidate, TopKBuffer};
use crate::error::Error;
use crate::select;

/// Parameters for text window extraction.
#[derive(Debug, Clone)]
pub struct TextParams {
    /// Window length in bytes. Only ASCII letters and digits qualify,
    /// so length in bytes equals length in characters.
    pub window_len: usize,
    /// Number of non-overlapping windows to select.
    pub count: usize,
    /// Lines per parallel partition.
    pub lines_per_chunk: usize,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            window_len: 5,
            count: 4,
            lines_per_chunk: 4096,
        }
    }
}

impl TextParams {
    /// Lossless per-partition buffer size: one accepted window overlaps
    /// at most `2 * len - 1` windows on its line, itself included.
    fn buffer_cap(&self) -> usize {
        self.count * (2 * self.window_len).saturating_sub(1).max(1)
    }
}

/// A selected window in the final result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SelectedWindow {
    /// Zero-based line index in the input.
    pub line: usize,
    /// Zero-based byte offset of the window start within the line.
    pub start: usize,
    /// Window text (ASCII alphanumeric).
    pub text: String,
}

impl SelectedWindow {
    /// Plane point for geometry: x = line index, y = start column.
    pub fn point(&self) -> [f64; 2] {
        [self.line as f64, self.start as f64]
    }
}

/// Extraction-time window borrowing its text from the input line.
#[derive(Debug, Clone, Copy)]
struct Window<'a> {
    line: usize,
    start: usize,
    text: &'a str,
}

impl Candidate for Window<'_> {
    fn cmp_priority(&self, other: &Self) -> Ordering {
        other
            .text
            .cmp(self.text)
            .then_with(|| self.line.cmp(&other.line))
            .then_with(|| self.start.cmp(&other.start))
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.line == other.line
            && self.start < other.start + other.text.len()
            && other.start < self.start + self.text.len()
    }
}

/// Offer every qualifying window of `line` to the buffer.
///
/// Scans maximal runs of ASCII-alphanumeric bytes; every byte of a
/// multibyte UTF-8 sequence is non-ASCII and therefore breaks a run,
/// so windows are always valid one-byte-per-char substrings.
fn scan_line<'a>(line: &'a str, line_idx: usize, len: usize, out: &mut TopKBuffer<Window<'a>>) {
    let bytes = line.as_bytes();
    if len == 0 || bytes.len() < len {
        return;
    }

    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_alphanumeric() {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        if i - run_start < len {
            continue;
        }
        for start in run_start..=(i - len) {
            out.push(Window {
                line: line_idx,
                start,
                // Run bytes are ASCII, so the slice is on char boundaries.
                text: &line[start..start + len],
            });
        }
    }
}

/// Extract and locally select winners for one chunk of lines.
fn extract_chunk<'a, S: AsRef<str>>(
    lines: &'a [S],
    first_line: usize,
    params: &TextParams,
) -> Vec<Window<'a>> {
    let mut buf = TopKBuffer::new(params.buffer_cap());
    for (offset, line) in lines.iter().enumerate() {
        scan_line(line.as_ref(), first_line + offset, params.window_len, &mut buf);
    }
    select::select_disjoint(buf.into_sorted(), params.count)
}

/// Select the best `count` pairwise-disjoint windows across all lines.
///
/// Chunks are independent partitions (a window never crosses a line, so
/// chunk boundaries cannot split a candidate); the merge runs the same
/// selector over the small union of per-chunk winners.
pub fn find_text_windows<S: AsRef<str> + Sync>(
    lines: &[S],
    params: &TextParams,
) -> Result<Vec<SelectedWindow>, Error> {
    let chunk_len = params.lines_per_chunk.max(1);

    let locals: Vec<Window<'_>> = lines
        .par_chunks(chunk_len)
        .enumerate()
        .flat_map_iter(|(chunk_idx, chunk)| extract_chunk(chunk, chunk_idx * chunk_len, params))
        .collect();

    tracing::debug!(
        "text extraction: {} local winner(s) from {} line(s)",
        locals.len(),
        lines.len()
    );

    let winners = select::select_exactly(locals, params.count)?;
    Ok(winners
        .into_iter()
        .map(|w| SelectedWindow {
            line: w.line,
            start: w.start,
            text: w.text.to_string(),
        })
        .collect())
}
