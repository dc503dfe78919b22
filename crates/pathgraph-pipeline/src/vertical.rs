//! VerticalDetector (§4.2): finds sustained vertical-motion runs before
//! floor separation, so stair and elevator points never contaminate a
//! floor cluster.
//!
//! ## Algorithm sketch
//! 1. Slide a window of `window` points over Z; a window is "marked" when
//!    its net Z change is large enough and most of its per-step changes
//!    agree in sign with that net change.
//! 2. Union the spans of every marked window into a boolean vertical
//!    mask, then split the mask into contiguous candidate passages.
//! 3. Discard passages too short or with too little total Z change;
//!    classify the rest as STAIRCASE or ELEVATOR by their XY/Z ratio.
//! 4. Merge adjacent same-direction passages separated by a small index
//!    gap — SLAM jitter can briefly break the per-step agreement check
//!    mid-staircase.

use pathgraph_core::constants::{
    MIN_STAIR_POINTS, MIN_TOTAL_Z_CHANGE, PASSAGE_MERGE_GAP, VERTICAL_WINDOW, Z_CHANGE_THRESHOLD,
};
use pathgraph_core::{Position, VerticalClass, VerticalDirection, VerticalPassage};

/// Sliding-window vertical-motion detector.
#[derive(Debug, Clone, Copy)]
pub struct VerticalDetector {
    window: usize,
    min_total_z_change: f64,
    z_change_threshold: f64,
    min_stair_points: usize,
    merge_gap: usize,
}

impl Default for VerticalDetector {
    fn default() -> Self {
        Self {
            window: VERTICAL_WINDOW,
            min_total_z_change: MIN_TOTAL_Z_CHANGE,
            z_change_threshold: Z_CHANGE_THRESHOLD,
            min_stair_points: MIN_STAIR_POINTS,
            merge_gap: PASSAGE_MERGE_GAP,
        }
    }
}

/// Output of [`VerticalDetector::detect`].
#[derive(Debug, Clone)]
pub struct VerticalDetectionResult {
    /// Surviving passages, in trajectory order.
    pub passages: Vec<VerticalPassage>,
    /// `true` at every index inside a surviving passage.
    pub vertical_mask: Vec<bool>,
}

impl VerticalDetector {
    /// Detect vertical passages over `positions` (already outlier-filtered).
    #[must_use]
    pub fn detect(&self, positions: &[Position]) -> VerticalDetectionResult {
        let n = positions.len();
        if n < self.window + 1 {
            return VerticalDetectionResult {
                passages: Vec::new(),
                vertical_mask: vec![false; n],
            };
        }

        let dz: Vec<f64> = (0..n - 1).map(|i| positions[i + 1].z - positions[i].z).collect();
        let mut mask = vec![false; n];

        for i in 0..=(n - 1 - self.window) {
            if self.window_is_marked(positions, &dz, i) {
                for idx in i..=(i + self.window) {
                    mask[idx] = true;
                }
            }
        }

        let candidates = Self::mask_to_runs(&mask);
        let surviving: Vec<VerticalPassage> = candidates
            .into_iter()
            .filter_map(|(start, end)| self.build_passage(positions, start, end))
            .collect();

        let merged = self.merge_adjacent(surviving, positions);

        VerticalDetectionResult {
            passages: merged,
            vertical_mask: mask,
        }
    }

    fn window_is_marked(&self, positions: &[Position], dz: &[f64], i: usize) -> bool {
        let net = positions[i + self.window].z - positions[i].z;
        if net.abs() <= self.min_total_z_change * (self.window as f64) / 20.0 {
            return false;
        }
        let sign = net.signum();
        let half_threshold = self.z_change_threshold / 2.0;
        let agreeing = dz[i..i + self.window]
            .iter()
            .filter(|&&d| d.signum() == sign && d.abs() > half_threshold)
            .count();
        agreeing * 2 > self.window
    }

    fn mask_to_runs(mask: &[bool]) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;
        for (i, &m) in mask.iter().enumerate() {
            match (m, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, mask.len()));
        }
        runs
    }

    fn build_passage(
        &self,
        positions: &[Position],
        start: usize,
        end: usize,
    ) -> Option<VerticalPassage> {
        if end - start < self.min_stair_points {
            return None;
        }
        let z_start = positions[start].z;
        let z_end = positions[end - 1].z;
        if (z_end - z_start).abs() < self.min_total_z_change {
            return None;
        }
        Some(Self::classify(positions, start, end, z_start, z_end))
    }

    fn classify(
        positions: &[Position],
        start: usize,
        end: usize,
        z_start: f64,
        z_end: f64,
    ) -> VerticalPassage {
        let xy_length: f64 = positions[start..end]
            .windows(2)
            .map(|w| w[0].xy_distance(&w[1]))
            .sum();
        let dz = (z_end - z_start).abs();
        let ratio = if dz <= 0.0 { f64::INFINITY } else { xy_length / dz };
        let classification = if ratio < 1.0 {
            VerticalClass::Elevator
        } else {
            VerticalClass::Staircase
        };
        let direction = if z_end >= z_start {
            VerticalDirection::Up
        } else {
            VerticalDirection::Down
        };
        VerticalPassage {
            start,
            end,
            classification,
            z_start,
            z_end,
            xy_length,
            direction,
            from_floor: pathgraph_core::UNKNOWN_FLOOR,
            to_floor: pathgraph_core::UNKNOWN_FLOOR,
        }
    }

    fn merge_adjacent(
        &self,
        passages: Vec<VerticalPassage>,
        positions: &[Position],
    ) -> Vec<VerticalPassage> {
        let mut out: Vec<VerticalPassage> = Vec::with_capacity(passages.len());
        for passage in passages {
            match out.last() {
                Some(prev)
                    if prev.direction == passage.direction
                        && passage.start.saturating_sub(prev.end) < self.merge_gap =>
                {
                    let prev = out.pop().expect("checked Some above");
                    let start = prev.start;
                    let end = passage.end;
                    let z_start = positions[start].z;
                    let z_end = positions[end - 1].z;
                    out.push(Self::classify(positions, start, end, z_start, z_end));
                }
                _ => out.push(passage),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staircase_trajectory() -> Vec<Position> {
        // Flat, then a sustained climb of 3m over 12 points with small xy
        // drift (staircase-shaped), then flat again.
        let mut points = Vec::new();
        for i in 0..20 {
            points.push(Position::new(i as f64 * 0.1, 0.0, 0.0));
        }
        for i in 0..12 {
            let z = i as f64 * (3.0 / 11.0);
            points.push(Position::new(2.0 + i as f64 * 0.2, 0.0, z));
        }
        for i in 0..20 {
            points.push(Position::new(4.0 + i as f64 * 0.1, 0.0, 3.0));
        }
        points
    }

    #[test]
    fn detects_a_staircase_climb() {
        let points = staircase_trajectory();
        let detector = VerticalDetector::default();
        let result = detector.detect(&points);
        assert_eq!(result.passages.len(), 1);
        let passage = &result.passages[0];
        assert_eq!(passage.classification, VerticalClass::Staircase);
        assert_eq!(passage.direction, VerticalDirection::Up);
        assert!(passage.z_displacement() >= MIN_TOTAL_Z_CHANGE);
    }

    #[test]
    fn flat_trajectory_has_no_passages() {
        let points: Vec<Position> = (0..50).map(|i| Position::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        let detector = VerticalDetector::default();
        let result = detector.detect(&points);
        assert!(result.passages.is_empty());
        assert!(result.vertical_mask.iter().all(|&m| !m));
    }

    #[test]
    fn elevator_has_small_xy_drift() {
        let mut points = Vec::new();
        for i in 0..20 {
            points.push(Position::new(i as f64 * 0.1, 0.0, 0.0));
        }
        for i in 0..12 {
            let z = i as f64 * (3.0 / 11.0);
            points.push(Position::new(2.0 + i as f64 * 0.01, 0.0, z));
        }
        for i in 0..20 {
            points.push(Position::new(2.12 + i as f64 * 0.1, 0.0, 3.0));
        }
        let detector = VerticalDetector::default();
        let result = detector.detect(&points);
        assert_eq!(result.passages.len(), 1);
        assert_eq!(result.passages[0].classification, VerticalClass::Elevator);
    }

    #[test]
    fn too_short_a_run_is_discarded() {
        // A tiny 2-point blip can't reach MIN_STAIR_POINTS.
        let points: Vec<Position> = (0..30)
            .map(|i| Position::new(i as f64 * 0.1, 0.0, 0.0))
            .collect();
        let detector = VerticalDetector::default();
        let result = detector.detect(&points);
        assert!(result.passages.is_empty());
    }
}
