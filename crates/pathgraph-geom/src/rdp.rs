// crates/pathgraph-geom/src/rdp.rs

//! Ramer-Douglas-Peucker polyline simplification (§4.6).

use pathgraph_core::Position;

/// Perpendicular distance from `p` to the chord `a -> b`, using the 3D
/// projection formula: `||(P-A) - ((P-A)·d) d||` for unit direction `d`.
///
/// Chords shorter than `1e-10` are considered degenerate; callers should
/// treat such chords as collapsing to their endpoints (see [`rdp_indices`]).
#[must_use]
pub fn perpendicular_distance(p: Position, a: Position, b: Position) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    let chord_len = (dx * dx + dy * dy + dz * dz).sqrt();
    if chord_len < 1e-10 {
        return p.distance(&a);
    }
    let (ux, uy, uz) = (dx / chord_len, dy / chord_len, dz / chord_len);

    let (vx, vy, vz) = (p.x - a.x, p.y - a.y, p.z - a.z);
    let proj = vx * ux + vy * uy + vz * uz;

    let (rx, ry, rz) = (vx - proj * ux, vy - proj * uy, vz - proj * uz);
    (rx * rx + ry * ry + rz * rz).sqrt()
}

/// Simplify `points` with RDP at tolerance `epsilon`, returning the indices
/// (into `points`, ascending) of the retained vertices. Always retains the
/// first and last index. Degenerate (near-zero-length) chords collapse to
/// just their two endpoints, per §4.6.
///
/// Returns an empty vector for `points.len() < 2` (nothing to simplify).
#[must_use]
pub fn rdp_indices(points: &[Position], epsilon: f64) -> Vec<usize> {
    if points.len() < 2 {
        return (0..points.len()).collect();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    rdp_recurse(points, 0, points.len() - 1, epsilon, &mut keep);

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

fn rdp_recurse(points: &[Position], lo: usize, hi: usize, epsilon: f64, keep: &mut [bool]) {
    if hi <= lo + 1 {
        return;
    }
    let a = points[lo];
    let b = points[hi];

    let mut max_dist = 0.0_f64;
    let mut max_idx = lo;
    for i in (lo + 1)..hi {
        let d = perpendicular_distance(points[i], a, b);
        if d.is_finite() && d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_idx != lo && max_dist > epsilon {
        keep[max_idx] = true;
        rdp_recurse(points, lo, max_idx, epsilon, keep);
        rdp_recurse(points, max_idx, hi, epsilon, keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Position {
        Position::new(x, y, 0.0)
    }

    #[test]
    fn straight_line_collapses_to_endpoints() {
        let pts = vec![pt(0.0, 0.0), pt(1.0, 0.01), pt(2.0, -0.01), pt(3.0, 0.0)];
        let idx = rdp_indices(&pts, 0.5);
        assert_eq!(idx, vec![0, 3]);
    }

    #[test]
    fn corner_is_retained() {
        let pts = vec![pt(0.0, 0.0), pt(2.5, 0.0), pt(5.0, 0.0), pt(5.0, 5.0)];
        let idx = rdp_indices(&pts, 0.1);
        assert_eq!(idx, vec![0, 2, 3]);
    }

    #[test]
    fn idempotent() {
        let pts = vec![
            pt(0.0, 0.0),
            pt(1.0, 0.3),
            pt(2.0, -0.2),
            pt(3.0, 4.0),
            pt(4.0, 4.1),
            pt(5.0, 4.0),
        ];
        let first: Vec<Position> = rdp_indices(&pts, 0.5).into_iter().map(|i| pts[i]).collect();
        let second: Vec<Position> = rdp_indices(&first, 0.5)
            .into_iter()
            .map(|i| first[i])
            .collect();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a.x - b.x).abs() < 1e-6);
            assert!((a.y - b.y).abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_chord_keeps_only_endpoints() {
        let pts = vec![pt(1.0, 1.0), pt(1.0, 1.0), pt(1.0, 1.0)];
        let idx = rdp_indices(&pts, 0.1);
        assert_eq!(idx, vec![0, 2]);
    }
}
