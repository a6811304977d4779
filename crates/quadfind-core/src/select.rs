//! Overlap-aware greedy top-K selection.
//!
//! Candidates are scanned in priority order (descending score, ascending
//! position on ties) and kept iff their span is disjoint from every span
//! already kept. Greedy is exact here: all spans in one run have the same
//! fixed size, so accepting the best-scoring candidate first never blocks
//! a better overall choice — any conflict is resolved by dropping the
//! lower-scoring side, which is what the scan does.

use crate::candidate::Candidate;
use crate::error::Error;

/// Keep the highest-priority pairwise-disjoint candidates, at most `k`.
///
/// Returns fewer than `k` entries when the input cannot supply them.
/// The result is sorted best-first and is invariant to the input order.
pub fn select_disjoint<C: Candidate>(mut candidates: Vec<C>, k: usize) -> Vec<C> {
    if k == 0 {
        return Vec::new();
    }
    candidates.sort_by(|a, b| a.cmp_priority(b));

    let mut kept: Vec<C> = Vec::with_capacity(k);
    'scan: for cand in candidates {
        for accepted in &kept {
            if cand.overlaps(accepted) {
                continue 'scan;
            }
        }
        kept.push(cand);
        if kept.len() == k {
            break;
        }
    }
    kept
}

/// Like [`select_disjoint`], but fails unless `k` candidates survive.
pub fn select_exactly<C: Candidate>(candidates: Vec<C>, k: usize) -> Result<Vec<C>, Error> {
    let kept = select_disjoint(candidates, k);
    if kept.len() < k {
        return Err(Error::InsufficientCandidates {
            found: kept.len(),
            needed: k,
        });
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// Fixed-width 1D interval candidate for selector tests.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Interval {
        score: u32,
        start: usize,
        width: usize,
    }

    impl Interval {
        fn new(score: u32, start: usize) -> Self {
            Self {
                score,
                start,
                width: 5,
            }
        }
    }

    impl Candidate for Interval {
        fn cmp_priority(&self, other: &Self) -> Ordering {
            other
                .score
                .cmp(&self.score)
                .then_with(|| self.start.cmp(&other.start))
        }

        fn overlaps(&self, other: &Self) -> bool {
            self.start < other.start + other.width && other.start < self.start + self.width
        }
    }

    #[test]
    fn keeps_best_disjoint_set() {
        // 90 at 2 conflicts with 100 at 0 and loses despite outranking 80/70.
        let cands = vec![
            Interval::new(100, 0),
            Interval::new(90, 2),
            Interval::new(80, 10),
            Interval::new(70, 20),
        ];
        let kept = select_disjoint(cands, 3);
        assert_eq!(
            kept.iter().map(|c| c.start).collect::<Vec<_>>(),
            vec![0, 10, 20]
        );
    }

    #[test]
    fn results_are_pairwise_disjoint() {
        let cands: Vec<Interval> = (0..200u32)
            .map(|i| Interval::new((i * 37) % 101, ((i * 3) % 150) as usize))
            .collect();
        let kept = select_disjoint(cands, 10);
        for i in 0..kept.len() {
            for j in (i + 1)..kept.len() {
                assert!(!kept[i].overlaps(&kept[j]), "{:?} vs {:?}", kept[i], kept[j]);
            }
        }
    }

    #[test]
    fn deterministic_under_shuffling() {
        let mut cands: Vec<Interval> = (0..100)
            .map(|i| Interval::new((i % 7) as u32, i * 2))
            .collect();
        let reference = select_disjoint(cands.clone(), 6);

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..20 {
            cands.shuffle(&mut rng);
            assert_eq!(select_disjoint(cands.clone(), 6), reference);
        }
    }

    #[test]
    fn equal_scores_break_by_position() {
        let cands = vec![
            Interval::new(50, 30),
            Interval::new(50, 10),
            Interval::new(50, 20),
        ];
        let kept = select_disjoint(cands, 2);
        assert_eq!(kept[0].start, 10);
        assert_eq!(kept[1].start, 20);
    }

    #[test]
    fn shortfall_reports_counts() {
        // Three overlapping intervals collapse to a single acceptance.
        let cands = vec![
            Interval::new(9, 0),
            Interval::new(8, 2),
            Interval::new(7, 4),
            Interval::new(6, 100),
        ];
        let err = select_exactly(cands, 4).unwrap_err();
        match err {
            Error::InsufficientCandidates { found, needed } => {
                assert_eq!(found, 2);
                assert_eq!(needed, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_k_selects_nothing() {
        let cands = vec![Interval::new(1, 0)];
        assert!(select_disjoint(cands, 0).is_empty());
    }
}
