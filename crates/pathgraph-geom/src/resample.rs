// crates/pathgraph-geom/src/resample.rs

//! Linear resampling of a single straight segment at uniform spacing (§4.6
//! step 3).

use pathgraph_core::Position;

/// Resample the straight segment `a -> b` at uniform `spacing`, returning
/// the points **strictly after `a`**, ending with `b` itself. Callers that
/// walk a polyline vertex by vertex should seed their output with the first
/// vertex once, then extend with the result of this function for every
/// subsequent pair — that yields "endpoints inclusive, no duplicates at
/// joins" across the whole polyline (§4.6).
///
/// A chord shorter than `1e-10` collapses to just `b` (its single
/// endpoint), matching the RDP degenerate-chord rule.
#[must_use]
pub fn resample_segment(a: Position, b: Position, spacing: f64) -> Vec<Position> {
    debug_assert!(spacing > 0.0, "resample spacing must be positive");

    let dist = a.distance(&b);
    if dist < 1e-10 {
        return vec![b];
    }

    let steps = (dist / spacing).floor() as usize;
    let mut out = Vec::with_capacity(steps + 1);
    for i in 1..=steps {
        let t = (i as f64) * spacing / dist;
        if t >= 1.0 {
            break;
        }
        out.push(lerp(a, b, t));
    }
    out.push(b);
    out
}

fn lerp(a: Position, b: Position, t: f64) -> Position {
    Position::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_is_uniform_with_short_tail() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(1.7, 0.0, 0.0);
        let pts = resample_segment(a, b, 0.5);
        // 0.5, 1.0, 1.5, 1.7 (tail shorter than 0.5)
        assert_eq!(pts.len(), 4);
        assert!((pts[0].x - 0.5).abs() < 1e-9);
        assert!((pts[1].x - 1.0).abs() < 1e-9);
        assert!((pts[2].x - 1.5).abs() < 1e-9);
        assert!((pts[3].x - 1.7).abs() < 1e-9);
    }

    #[test]
    fn exact_multiple_has_no_duplicate_endpoint() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(1.0, 0.0, 0.0);
        let pts = resample_segment(a, b, 0.5);
        assert_eq!(pts.len(), 2);
        assert!((pts.last().unwrap().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_segment_collapses_to_endpoint() {
        let a = Position::new(3.0, 3.0, 0.0);
        let b = Position::new(3.0, 3.0, 0.0);
        let pts = resample_segment(a, b, 0.5);
        assert_eq!(pts, vec![b]);
    }
}
