//! Candidate model shared by both extraction domains.
//!
//! A candidate is a scored, positioned feature occupying a span of the
//! input (a byte range within one line, or a square pixel block). Spans
//! are only compared for overlap; scores and positions define a strict
//! total order so selection is deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A scored, positioned feature competing for selection.
///
/// `cmp_priority` must be a strict total order with the best candidate
/// first: descending score, ties broken by ascending position (line/row,
/// then start/column). The position tie-break makes results independent
/// of the order candidates were generated in.
pub trait Candidate {
    /// Selection priority: `Less` means `self` is selected before `other`.
    fn cmp_priority(&self, other: &Self) -> Ordering;

    /// Whether the occupied spans share any byte/pixel.
    fn overlaps(&self, other: &Self) -> bool;
}

/// Max-heap wrapper keyed so the heap root is the *lowest-priority*
/// retained candidate.
struct Worst<C>(C);

impl<C: Candidate> PartialEq for Worst<C> {
    fn eq(&self, other: &Self) -> bool {
        self.0.cmp_priority(&other.0) == Ordering::Equal
    }
}

impl<C: Candidate> Eq for Worst<C> {}

impl<C: Candidate> PartialOrd for Worst<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Candidate> Ord for Worst<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_priority(&other.0)
    }
}

/// Bounded collector retaining the `cap` highest-priority candidates seen.
///
/// Extraction streams millions of candidates per partition; only a small
/// prefix of the priority order can ever be accepted, so the rest is
/// dropped on the fly instead of being materialized and sorted.
///
/// For a selection of `k` disjoint spans, `cap = k * m` is lossless when
/// `m` bounds how many candidates a single span can overlap (including
/// itself): greedy scanning of the retained prefix accepts exactly the
/// same `k` candidates as greedy scanning of the full stream, because
/// every candidate the full scan visits before its k-th acceptance lies
/// within that prefix.
pub struct TopKBuffer<C> {
    cap: usize,
    heap: BinaryHeap<Worst<C>>,
}

impl<C: Candidate> TopKBuffer<C> {
    /// Create a collector retaining at most `cap` candidates.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap + 1),
        }
    }

    /// Offer a candidate, evicting the lowest-priority one when full.
    pub fn push(&mut self, cand: C) {
        if self.cap == 0 {
            return;
        }
        if self.heap.len() < self.cap {
            self.heap.push(Worst(cand));
            return;
        }
        let worst = self.heap.peek().expect("buffer is non-empty at capacity");
        if cand.cmp_priority(&worst.0) == Ordering::Less {
            self.heap.pop();
            self.heap.push(Worst(cand));
        }
    }

    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a vector sorted by priority, best first.
    pub fn into_sorted(self) -> Vec<C> {
        let mut items: Vec<C> = self.heap.into_iter().map(|w| w.0).collect();
        items.sort_by(|a, b| a.cmp_priority(b));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// Minimal 1D candidate: score + start offset, unit-width span.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Cell {
        score: i32,
        at: usize,
    }

    impl Candidate for Cell {
        fn cmp_priority(&self, other: &Self) -> Ordering {
            other
                .score
                .cmp(&self.score)
                .then_with(|| self.at.cmp(&other.at))
        }

        fn overlaps(&self, other: &Self) -> bool {
            self.at == other.at
        }
    }

    #[test]
    fn buffer_retains_highest_priority() {
        let mut buf = TopKBuffer::new(3);
        for (score, at) in [(1, 0), (9, 1), (4, 2), (7, 3), (2, 4)] {
            buf.push(Cell { score, at });
        }
        let kept = buf.into_sorted();
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0], Cell { score: 9, at: 1 });
        assert_eq!(kept[1], Cell { score: 7, at: 3 });
        assert_eq!(kept[2], Cell { score: 4, at: 2 });
    }

    #[test]
    fn buffer_is_order_independent() {
        let mut cells: Vec<Cell> = (0..100).map(|i| Cell { score: i % 10, at: i as usize }).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        let mut reference = TopKBuffer::new(8);
        for &c in &cells {
            reference.push(c);
        }
        let reference = reference.into_sorted();

        for _ in 0..10 {
            cells.shuffle(&mut rng);
            let mut buf = TopKBuffer::new(8);
            for &c in &cells {
                buf.push(c);
            }
            assert_eq!(buf.into_sorted(), reference);
        }
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut buf: TopKBuffer<Cell> = TopKBuffer::new(0);
        buf.push(Cell { score: 5, at: 0 });
        assert!(buf.is_empty());
    }
}
