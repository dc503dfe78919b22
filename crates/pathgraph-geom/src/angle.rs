// crates/pathgraph-geom/src/angle.rs

//! Turning-angle computation for junction detection (§4.7).

use pathgraph_core::Position;

/// The turning angle at `cur`, in degrees, between the incoming direction
/// `cur - prev` and the outgoing direction `next - cur`. Returns `0.0` when
/// either leg has near-zero length (no well-defined direction), matching
/// §4.9's "never propagate NaN" rule.
#[must_use]
pub fn turning_angle_degrees(prev: Position, cur: Position, next: Position) -> f64 {
    let (ax, ay) = (cur.x - prev.x, cur.y - prev.y);
    let (bx, by) = (next.x - cur.x, next.y - cur.y);

    let a_len = (ax * ax + ay * ay).sqrt();
    let b_len = (bx * bx + by * by).sqrt();
    if a_len < 1e-10 || b_len < 1e-10 {
        return 0.0;
    }

    let cos_theta = ((ax * bx + ay * by) / (a_len * b_len)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}
