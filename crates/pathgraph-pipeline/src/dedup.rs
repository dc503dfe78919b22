//! Deduplicator (§4.5): per floor, two-stage cleanup.
//!
//! Stage 1 collapses back-and-forth re-traversals (walking a corridor
//! and returning) down to the outbound trajectory. Stage 2 removes
//! spatially near-duplicate points via a KD-tree, never pairwise `O(N^2)`.

use pathgraph_core::constants::{DEDUP_DISTANCE_THRESHOLD, DEDUP_OVERLAP_THRESHOLD};
use pathgraph_core::Position;
use pathgraph_geom::KdTree3;

/// Two-stage per-floor deduplicator.
#[derive(Debug, Clone, Copy)]
pub struct Deduplicator {
    overlap_threshold: f64,
    distance_threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            overlap_threshold: DEDUP_OVERLAP_THRESHOLD,
            distance_threshold: DEDUP_DISTANCE_THRESHOLD,
        }
    }
}

/// Full result of [`Deduplicator::run_tracked`], including whether
/// either stage's safety net (§4.5 "Safety", §7 `DegenerateThreshold`)
/// fired.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub points: Vec<Position>,
    pub original_indices: Vec<usize>,
    pub stage1_fallback_triggered: bool,
    pub stage2_fallback_triggered: bool,
}

impl Deduplicator {
    /// Run both stages over one floor's points (already in trajectory
    /// order). `original_indices[k]` is the source trajectory index of
    /// `points[k]`. Returns the surviving points and their original
    /// indices, in order.
    ///
    /// If either stage would leave fewer than 2 points, that stage's
    /// input is returned unchanged (§4.5 "Safety").
    #[must_use]
    pub fn run(&self, points: &[Position], original_indices: &[usize]) -> (Vec<Position>, Vec<usize>) {
        let outcome = self.run_tracked(points, original_indices);
        (outcome.points, outcome.original_indices)
    }

    /// Like [`Self::run`], but also reports whether either stage's
    /// degenerate-threshold safety net fired.
    #[must_use]
    pub fn run_tracked(&self, points: &[Position], original_indices: &[usize]) -> DedupOutcome {
        debug_assert_eq!(points.len(), original_indices.len());

        let stage1_idx = self.stage1(points);
        let stage1_fallback_triggered = stage1_idx.len() < 2;
        let (stage1_points, stage1_orig) = if stage1_fallback_triggered {
            (points.to_vec(), original_indices.to_vec())
        } else {
            (
                stage1_idx.iter().map(|&i| points[i]).collect::<Vec<_>>(),
                stage1_idx.iter().map(|&i| original_indices[i]).collect::<Vec<_>>(),
            )
        };

        let stage2_idx = self.stage2(&stage1_points);
        let stage2_fallback_triggered = stage2_idx.len() < 2;
        let (points, original_indices) = if stage2_fallback_triggered {
            (stage1_points, stage1_orig)
        } else {
            (
                stage2_idx.iter().map(|&i| stage1_points[i]).collect(),
                stage2_idx.iter().map(|&i| stage1_orig[i]).collect(),
            )
        };

        DedupOutcome {
            points,
            original_indices,
            stage1_fallback_triggered,
            stage2_fallback_triggered,
        }
    }

    /// Stage 1: back-and-forth merge. Returns indices into `points`.
    fn stage1(&self, points: &[Position]) -> Vec<usize> {
        let n = points.len();
        let mut emitted: Vec<usize> = Vec::new();
        let mut i = 0usize;

        while i < n {
            let candidate = points[i];
            let revisit_match = if emitted.len() >= 2 {
                emitted[..emitted.len() - 1]
                    .iter()
                    .rev()
                    .find(|&&e| points[e].distance(&candidate) <= self.overlap_threshold)
                    .copied()
            } else {
                None
            };

            match revisit_match {
                Some(match_idx) => {
                    let mut j = i;
                    while j < n {
                        let far_enough = (match_idx..=i)
                            .all(|k| points[k].distance(&points[j]) > self.overlap_threshold);
                        if far_enough {
                            break;
                        }
                        j += 1;
                    }
                    if j >= n {
                        break;
                    }
                    i = j;
                }
                None => {
                    emitted.push(i);
                    i += 1;
                }
            }
        }

        emitted
    }

    /// Stage 2: spatial dedup via KD-tree. Returns indices into `points`.
    fn stage2(&self, points: &[Position]) -> Vec<usize> {
        let n = points.len();
        let tree = KdTree3::build(points);
        let mut claimed = vec![false; n];
        let mut keep = Vec::new();

        for i in 0..n {
            if claimed[i] {
                continue;
            }
            keep.push(i);
            for neighbor in tree.within_radius(points[i], self.distance_threshold) {
                if neighbor != i {
                    claimed[neighbor] = true;
                }
            }
        }
        keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn back_and_forth_collapses_to_outbound_only() {
        // S3: x: 0..5 then 5..0 along y=0.
        let mut points = Vec::new();
        for i in 0..=15 {
            points.push(Position::new(i as f64 / 3.0, 0.0, 0.0));
        }
        for i in (0..15).rev() {
            points.push(Position::new(i as f64 / 3.0, 0.0, 0.0));
        }
        let original_indices = idx(points.len());
        let (deduped, _) = Deduplicator::default().run(&points, &original_indices);

        let length: f64 = deduped.windows(2).map(|w| w[0].distance(&w[1])).sum();
        assert!(length < 7.0, "collapsed length should be close to 5m, got {length}");
    }

    #[test]
    fn spatial_dedup_removes_near_duplicates() {
        let points = vec![
            Position::new(0.0, 0.0, 0.0),
            Position::new(0.05, 0.0, 0.0),
            Position::new(0.1, 0.0, 0.0),
            Position::new(5.0, 0.0, 0.0),
        ];
        let original_indices = idx(points.len());
        let (deduped, kept_indices) = Deduplicator::default().run(&points, &original_indices);
        assert!(deduped.len() < points.len());
        // order-preserving
        for w in kept_indices.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn idempotent_on_already_clean_trajectory() {
        let points: Vec<Position> = (0..20).map(|i| Position::new(i as f64 * 1.0, 0.0, 0.0)).collect();
        let original_indices = idx(points.len());
        let dedup = Deduplicator::default();
        let (first, _) = dedup.run(&points, &original_indices);
        let first_indices = idx(first.len());
        let (second, _) = dedup.run(&first, &first_indices);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn safety_returns_input_unchanged_when_result_would_be_too_small() {
        let points = vec![Position::new(0.0, 0.0, 0.0), Position::new(0.01, 0.0, 0.0)];
        let original_indices = idx(points.len());
        let (deduped, kept) = Deduplicator::default().run(&points, &original_indices);
        assert_eq!(deduped.len(), 2);
        assert_eq!(kept, original_indices);
    }
}
