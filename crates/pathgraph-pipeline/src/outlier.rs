//! Outlier rejection pre-pass.
//!
//! Runs ahead of [`crate::vertical`] and drops points whose 3D jump from
//! their immediate predecessor exceeds [`OUTLIER_JUMP_THRESHOLD`] — a
//! displacement no real single-frame SLAM pose can produce. Always
//! applied; the dropped count is folded into
//! [`pathgraph_core::PipelineStats::outliers_dropped`].

use pathgraph_core::{constants::OUTLIER_JUMP_THRESHOLD, PoseRecord};

/// Drop trajectory points whose distance from the previous surviving
/// point exceeds [`OUTLIER_JUMP_THRESHOLD`]. The first point is always
/// kept. Returns the filtered trajectory and the number of points
/// dropped.
#[must_use]
pub fn reject_outliers(trajectory: &[PoseRecord]) -> (Vec<PoseRecord>, usize) {
    let mut out: Vec<PoseRecord> = Vec::with_capacity(trajectory.len());
    let mut dropped = 0usize;

    for record in trajectory {
        match out.last() {
            Some(prev) if prev.position.distance(&record.position) > OUTLIER_JUMP_THRESHOLD => {
                dropped += 1;
            }
            _ => out.push(*record),
        }
    }

    (out, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathgraph_core::Position;

    fn rec(id: i64, x: f64) -> PoseRecord {
        PoseRecord {
            id,
            position: Position::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn keeps_a_smooth_trajectory_intact() {
        let traj = vec![rec(0, 0.0), rec(1, 0.5), rec(2, 1.0)];
        let (out, dropped) = reject_outliers(&traj);
        assert_eq!(out.len(), 3);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn drops_a_single_frame_jump() {
        let traj = vec![rec(0, 0.0), rec(1, 0.5), rec(2, 50.0), rec(3, 0.7)];
        let (out, dropped) = reject_outliers(&traj);
        assert_eq!(dropped, 1);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn comparison_uses_last_surviving_point_not_raw_predecessor() {
        // id=2 is a jump from id=1 and gets dropped; id=3 must then be
        // compared against id=1 (the last surviving point), not id=2.
        let traj = vec![rec(0, 0.0), rec(1, 0.5), rec(2, 50.0), rec(3, 50.3)];
        let (out, dropped) = reject_outliers(&traj);
        assert_eq!(dropped, 2);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1]);
    }
}
