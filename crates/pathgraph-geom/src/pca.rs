// crates/pathgraph-geom/src/pca.rs

//! 2D principal-axis estimation via power iteration over the planar
//! covariance matrix, used by the PCA-projection path flattener (an
//! opt-in alternative to RDP simplification).

use pathgraph_core::Position;

/// The dominant planar (XY) direction of `points`, as a unit vector
/// `(dx, dy)`, found by power iteration on the 2x2 covariance matrix of
/// the centered XY coordinates.
///
/// Returns `None` if fewer than two points are given, or if the points are
/// coincident (zero variance in both axes).
#[must_use]
pub fn pca_direction_2d(points: &[Position]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut cxx = 0.0_f64;
    let mut cxy = 0.0_f64;
    let mut cyy = 0.0_f64;
    for p in points {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        cxx += dx * dx;
        cxy += dx * dy;
        cyy += dy * dy;
    }
    cxx /= n;
    cxy /= n;
    cyy /= n;

    if cxx.abs() < 1e-12 && cxy.abs() < 1e-12 && cyy.abs() < 1e-12 {
        return None;
    }

    // Power iteration on the symmetric 2x2 covariance matrix.
    let (mut vx, mut vy) = (1.0_f64, 0.0_f64);
    for _ in 0..50 {
        let (nx, ny) = (cxx * vx + cxy * vy, cxy * vx + cyy * vy);
        let norm = (nx * nx + ny * ny).sqrt();
        if norm < 1e-15 {
            break;
        }
        vx = nx / norm;
        vy = ny / norm;
    }

    let norm = (vx * vx + vy * vy).sqrt();
    if norm < 1e-15 {
        return None;
    }
    Some((vx / norm, vy / norm))
}

/// Project `p` onto the line through `origin` with direction `dir` (assumed
/// unit length), returning the projected point in the XY plane. The `z`
/// coordinate is carried over from `p` unchanged.
#[must_use]
pub fn project_to_line(p: Position, origin: Position, dir: (f64, f64)) -> Position {
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    let t = dx * dir.0 + dy * dir.1;
    Position::new(origin.x + t * dir.0, origin.y + t * dir.1, p.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Position {
        Position::new(x, y, 0.0)
    }

    #[test]
    fn finds_axis_of_collinear_points() {
        let pts = vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0), pt(3.0, 3.0)];
        let (dx, dy) = pca_direction_2d(&pts).expect("non-degenerate input");
        // direction should be parallel to (1, 1) up to sign.
        let cross = dx * 1.0 - dy * 1.0;
        assert!(cross.abs() < 1e-6, "cross={cross}");
    }

    #[test]
    fn coincident_points_return_none() {
        let pts = vec![pt(5.0, 5.0), pt(5.0, 5.0), pt(5.0, 5.0)];
        assert!(pca_direction_2d(&pts).is_none());
    }

    #[test]
    fn too_few_points_return_none() {
        let pts = vec![pt(0.0, 0.0)];
        assert!(pca_direction_2d(&pts).is_none());
    }

    #[test]
    fn projection_lands_on_line() {
        let origin = pt(0.0, 0.0);
        let dir = (1.0, 0.0);
        let p = Position::new(3.0, 4.0, 1.5);
        let proj = project_to_line(p, origin, dir);
        assert!((proj.x - 3.0).abs() < 1e-9);
        assert!((proj.y - 0.0).abs() < 1e-9);
        assert!((proj.z - 1.5).abs() < 1e-9);
    }
}
