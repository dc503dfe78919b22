//! PathFlattener (§4.6): snaps a per-floor point sequence to straight
//! lines.
//!
//! The default [`RdpFlattener`] (RDP + linear resampling) is what the
//! pipeline always uses; [`PcaFlattener`] is an opt-in alternative that
//! fits each segment's dominant direction with PCA instead of keeping
//! raw polyline vertices — viable, but harder to stabilize around
//! L-junctions, so it is never selected by default.
//!
//! Both implementations first split the input at gaps exceeding
//! [`GAP_THRESHOLD`]; each resulting run is flattened independently and
//! never bridged.

use pathgraph_core::constants::{GAP_THRESHOLD, RDP_EPSILON, RESAMPLE_SPACING};
use pathgraph_core::Position;
use pathgraph_geom::{pca::project_to_line, pca_direction_2d, rdp_indices, resample_segment};

/// A per-floor polyline flattener.
pub trait Flattener {
    /// Flatten `points` (one floor's deduplicated trajectory) into a
    /// straight-line-snapped polyline. Gaps beyond [`GAP_THRESHOLD`] are
    /// preserved as segment boundaries, never bridged.
    fn flatten(&self, points: &[Position]) -> Vec<Position>;
}

fn split_into_runs(points: &[Position], gap_threshold: f64) -> Vec<&[Position]> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..points.len() {
        if points[i - 1].distance(&points[i]) > gap_threshold {
            runs.push(&points[start..i]);
            start = i;
        }
    }
    runs.push(&points[start..]);
    runs
}

/// RDP simplification + uniform resampling (the default flattener).
#[derive(Debug, Clone, Copy)]
pub struct RdpFlattener {
    gap_threshold: f64,
    epsilon: f64,
    spacing: f64,
}

impl Default for RdpFlattener {
    fn default() -> Self {
        Self {
            gap_threshold: GAP_THRESHOLD,
            epsilon: RDP_EPSILON,
            spacing: RESAMPLE_SPACING,
        }
    }
}

impl RdpFlattener {
    /// Build a flattener with independently tunable RDP epsilon and
    /// resample spacing (§9: the two happen to share a default value,
    /// but nothing ties them together).
    #[must_use]
    pub fn new(gap_threshold: f64, epsilon: f64, spacing: f64) -> Self {
        Self {
            gap_threshold,
            epsilon,
            spacing,
        }
    }

    fn flatten_run(&self, run: &[Position]) -> Vec<Position> {
        if run.len() < 2 {
            return run.to_vec();
        }
        let vertex_idx = rdp_indices(run, self.epsilon);
        let mut out = Vec::with_capacity(run.len());
        out.push(run[vertex_idx[0]]);
        for w in vertex_idx.windows(2) {
            let a = run[w[0]];
            let b = run[w[1]];
            out.extend(resample_segment(a, b, self.spacing));
        }
        out
    }
}

impl Flattener for RdpFlattener {
    fn flatten(&self, points: &[Position]) -> Vec<Position> {
        split_into_runs(points, self.gap_threshold)
            .into_iter()
            .flat_map(|run| self.flatten_run(run))
            .collect()
    }
}

/// PCA-projection flattener (opt-in alternative to [`RdpFlattener`]).
#[derive(Debug, Clone, Copy)]
pub struct PcaFlattener {
    gap_threshold: f64,
    deviation_tolerance: f64,
    spacing: f64,
}

impl Default for PcaFlattener {
    fn default() -> Self {
        Self {
            gap_threshold: GAP_THRESHOLD,
            deviation_tolerance: RDP_EPSILON,
            spacing: RESAMPLE_SPACING,
        }
    }
}

impl PcaFlattener {
    /// Build a PCA flattener with an explicit max-deviation split
    /// tolerance and resample spacing.
    #[must_use]
    pub fn new(gap_threshold: f64, deviation_tolerance: f64, spacing: f64) -> Self {
        Self {
            gap_threshold,
            deviation_tolerance,
            spacing,
        }
    }

    /// Fit a segment's dominant direction with PCA, recursively splitting
    /// at the point of maximum deviation from that line when it exceeds
    /// `deviation_tolerance`. Returns the retained corner vertices.
    fn straighten(&self, run: &[Position]) -> Vec<Position> {
        if run.len() < 2 {
            return run.to_vec();
        }
        let Some(dir) = pca_direction_2d(run) else {
            // Degenerate (coincident) points: collapse to endpoints.
            return vec![run[0], run[run.len() - 1]];
        };
        let centroid = {
            let n = run.len() as f64;
            Position::new(
                run.iter().map(|p| p.x).sum::<f64>() / n,
                run.iter().map(|p| p.y).sum::<f64>() / n,
                run.iter().map(|p| p.z).sum::<f64>() / n,
            )
        };

        let mut max_dev = 0.0_f64;
        let mut max_idx = 0usize;
        for (i, p) in run.iter().enumerate() {
            let proj = project_to_line(*p, centroid, dir);
            let dev = p.distance(&proj);
            if dev > max_dev {
                max_dev = dev;
                max_idx = i;
            }
        }

        if max_dev > self.deviation_tolerance && max_idx != 0 && max_idx != run.len() - 1 {
            let mut left = self.straighten(&run[..=max_idx]);
            let right = self.straighten(&run[max_idx..]);
            left.pop();
            left.extend(right);
            left
        } else {
            let first_proj = project_to_line(run[0], centroid, dir);
            let last_proj = project_to_line(run[run.len() - 1], centroid, dir);
            vec![first_proj, last_proj]
        }
    }

    fn flatten_run(&self, run: &[Position]) -> Vec<Position> {
        if run.len() < 2 {
            return run.to_vec();
        }
        let vertices = self.straighten(run);
        let mut out = Vec::with_capacity(run.len());
        out.push(vertices[0]);
        for w in vertices.windows(2) {
            out.extend(resample_segment(w[0], w[1], self.spacing));
        }
        out
    }
}

impl Flattener for PcaFlattener {
    fn flatten(&self, points: &[Position]) -> Vec<Position> {
        split_into_runs(points, self.gap_threshold)
            .into_iter()
            .flat_map(|run| self.flatten_run(run))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Position {
        Position::new(x, y, 0.0)
    }

    #[test]
    fn rdp_flattener_collapses_a_jittery_straight_corridor() {
        let points = vec![pt(0.0, 0.0), pt(1.0, 0.05), pt(2.0, -0.05), pt(3.0, 0.0)];
        let flattened = RdpFlattener::default().flatten(&points);
        assert!((flattened.first().unwrap().x - 0.0).abs() < 1e-9);
        assert!((flattened.last().unwrap().x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn rdp_flattener_never_bridges_a_large_gap() {
        let points = vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(20.0, 0.0), pt(21.0, 0.0)];
        let flattened = RdpFlattener::default().flatten(&points);
        // There must be a consecutive pair still 19m apart: the gap survives.
        assert!(flattened.windows(2).any(|w| w[0].distance(&w[1]) > 15.0));
    }

    #[test]
    fn rdp_flattener_is_idempotent() {
        let points = vec![pt(0.0, 0.0), pt(1.0, 0.3), pt(2.0, -0.2), pt(3.0, 4.0), pt(4.0, 4.1)];
        let flattener = RdpFlattener::default();
        let first = flattener.flatten(&points);
        let second = flattener.flatten(&first);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn pca_flattener_handles_a_straight_run() {
        let points: Vec<Position> = (0..10).map(|i| pt(i as f64, 0.01 * (i % 2) as f64)).collect();
        let flattened = PcaFlattener::default().flatten(&points);
        assert!(flattened.len() >= 2);
    }
}
