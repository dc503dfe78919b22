// crates/pathgraph-geom/src/kdtree.rs

//! A small, deterministic 3D KD-tree for planar/spatial nearest-neighbor and
//! radius queries (§4.5 Deduplicator stage 2 forbids O(N^2) pairwise
//! comparison).
//!
//! Determinism (§9 "Floating-point determinism"): ties on a split axis are
//! broken by ascending original index, and query results are always
//! returned in ascending original-index order, so re-running the same
//! dedup on the same input always produces the same claimant/duplicate
//! assignment.

use pathgraph_core::Position;

struct Node {
    point_index: usize,
    axis: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// An immutable KD-tree over a fixed set of 3D points, queried by original
/// index.
pub struct KdTree3 {
    points: Vec<Position>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree3 {
    /// Build a tree over `points`. `O(n log^2 n)`.
    #[must_use]
    pub fn build(points: &[Position]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build_rec(points, &mut order, 0, &mut nodes);
        Self {
            points: points.to_vec(),
            nodes,
            root,
        }
    }

    fn build_rec(
        points: &[Position],
        order: &mut [usize],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if order.is_empty() {
            return None;
        }
        let axis = (depth % 3) as u8;
        order.sort_by(|&a, &b| {
            let ka = (axis_value(points[a], axis), a);
            let kb = (axis_value(points[b], axis), b);
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mid = order.len() / 2;
        let point_index = order[mid];

        let (left_order, right_order_with_mid) = order.split_at_mut(mid);
        let right_order = &mut right_order_with_mid[1..];

        let left = Self::build_rec(points, left_order, depth + 1, nodes);
        let right = Self::build_rec(points, right_order, depth + 1, nodes);

        nodes.push(Node {
            point_index,
            axis,
            left,
            right,
        });
        Some(nodes.len() - 1)
    }

    /// All original indices within `radius` of `query` (inclusive), in
    /// ascending index order.
    #[must_use]
    pub fn within_radius(&self, query: Position, radius: f64) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_rec(root, query, radius, &mut out);
        }
        out.sort_unstable();
        out
    }

    fn collect_rec(&self, node_idx: usize, query: Position, radius: f64, out: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];
        let p = self.points[node.point_index];
        if p.distance(&query) <= radius {
            out.push(node.point_index);
        }
        let axis_diff = axis_value(query, node.axis) - axis_value(p, node.axis);
        let (near, far) = if axis_diff <= 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(n) = near {
            self.collect_rec(n, query, radius, out);
        }
        if axis_diff.abs() <= radius {
            if let Some(f) = far {
                self.collect_rec(f, query, radius, out);
            }
        }
    }

    /// The nearest point's original index, or `None` if the tree is empty.
    #[must_use]
    pub fn nearest(&self, query: Position) -> Option<usize> {
        let root = self.root?;
        let mut best: Option<(usize, f64)> = None;
        self.nearest_rec(root, query, &mut best);
        best.map(|(idx, _)| idx)
    }

    fn nearest_rec(&self, node_idx: usize, query: Position, best: &mut Option<(usize, f64)>) {
        let node = &self.nodes[node_idx];
        let p = self.points[node.point_index];
        let d = p.distance(&query);
        let better = match best {
            Some((bi, bd)) => d < *bd || ((d - *bd).abs() < 1e-12 && node.point_index < *bi),
            None => true,
        };
        if better {
            *best = Some((node.point_index, d));
        }

        let axis_diff = axis_value(query, node.axis) - axis_value(p, node.axis);
        let (near, far) = if axis_diff <= 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(n) = near {
            self.nearest_rec(n, query, best);
        }
        let prune_radius = best.map_or(f64::INFINITY, |(_, bd)| bd);
        if axis_diff.abs() <= prune_radius {
            if let Some(f) = far {
                self.nearest_rec(f, query, best);
            }
        }
    }
}

#[inline]
fn axis_value(p: Position, axis: u8) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, z: f64) -> Position {
        Position::new(x, y, z)
    }

    #[test]
    fn within_radius_is_ascending_and_complete() {
        let pts = vec![
            pt(0.0, 0.0, 0.0),
            pt(0.1, 0.0, 0.0),
            pt(5.0, 0.0, 0.0),
            pt(0.2, 0.1, 0.0),
        ];
        let tree = KdTree3::build(&pts);
        let hits = tree.within_radius(pt(0.0, 0.0, 0.0), 0.3);
        assert_eq!(hits, vec![0, 1, 3]);
    }

    #[test]
    fn nearest_finds_closest() {
        let pts = vec![pt(0.0, 0.0, 0.0), pt(10.0, 0.0, 0.0), pt(9.5, 0.0, 0.0)];
        let tree = KdTree3::build(&pts);
        let n = tree.nearest(pt(10.2, 0.0, 0.0));
        assert_eq!(n, Some(1));
    }

    #[test]
    fn empty_tree_queries_are_safe() {
        let pts: Vec<Position> = vec![];
        let tree = KdTree3::build(&pts);
        assert_eq!(tree.within_radius(pt(0.0, 0.0, 0.0), 1.0), Vec::<usize>::new());
        assert_eq!(tree.nearest(pt(0.0, 0.0, 0.0)), None);
    }
}
