//! GraphBuilder (§4.7): per-floor junction detection, node
//! classification, and edge extraction over a flattened polyline.

use pathgraph_core::constants::{
    EDGE_CONNECTION_RADIUS, JUNCTION_ANGLE_DEGREES, JUNCTION_MERGE_RADIUS, JUNCTION_NEIGHBOR_SPAN,
    NODE_SPACING,
};
use pathgraph_core::{Edge, EdgeKind, Node, NodeKind, Position};
use pathgraph_geom::turning_angle_degrees;
use uuid::Uuid;

/// Builds nodes and HORIZONTAL edges from one floor's flattened polyline.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    junction_angle_degrees: f64,
    neighbor_span: usize,
    merge_radius: f64,
    node_spacing: f64,
    edge_connection_radius: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            junction_angle_degrees: JUNCTION_ANGLE_DEGREES,
            neighbor_span: JUNCTION_NEIGHBOR_SPAN,
            merge_radius: JUNCTION_MERGE_RADIUS,
            node_spacing: NODE_SPACING,
            edge_connection_radius: EDGE_CONNECTION_RADIUS,
        }
    }
}

/// One candidate junction before merging: the polyline index and its
/// turning angle.
struct Candidate {
    index: usize,
    angle: f64,
}

impl GraphBuilder {
    /// Build nodes and edges over `polyline` for `floor_level`.
    #[must_use]
    pub fn build(&self, polyline: &[Position], floor_level: u32) -> (Vec<Node>, Vec<Edge>) {
        if polyline.is_empty() {
            return (Vec::new(), Vec::new());
        }
        if polyline.len() == 1 {
            let node = self.new_node(polyline[0], NodeKind::Endpoint, floor_level, 0);
            return (vec![node], Vec::new());
        }

        let junctions = self.detect_junctions(polyline);
        let nodes = self.extract_nodes(polyline, &junctions, floor_level);
        let edges = self.extract_edges(polyline, &nodes);
        (nodes, edges)
    }

    fn detect_junctions(&self, polyline: &[Position]) -> Vec<usize> {
        let n = polyline.len();
        let span = self.neighbor_span;
        let mut candidates: Vec<Candidate> = Vec::new();

        if n > 2 * span {
            for i in span..(n - span) {
                let angle = turning_angle_degrees(polyline[i - 1], polyline[i], polyline[i + 1]);
                if angle >= self.junction_angle_degrees {
                    candidates.push(Candidate { index: i, angle });
                }
            }
        }

        self.merge_candidates(polyline, candidates)
    }

    fn merge_candidates(&self, polyline: &[Position], candidates: Vec<Candidate>) -> Vec<usize> {
        let mut merged: Vec<usize> = Vec::new();
        let mut group: Vec<&Candidate> = Vec::new();

        let mut flush = |group: &mut Vec<&Candidate>, out: &mut Vec<usize>| {
            if group.is_empty() {
                return;
            }
            let best = group
                .iter()
                .max_by(|a, b| a.angle.partial_cmp(&b.angle).unwrap_or(std::cmp::Ordering::Equal))
                .expect("group is non-empty");
            out.push(best.index);
            group.clear();
        };

        for candidate in &candidates {
            let should_merge = group
                .last()
                .is_some_and(|prev: &&Candidate| polyline[prev.index].distance(&polyline[candidate.index]) < self.merge_radius);
            if !should_merge {
                flush(&mut group, &mut merged);
            }
            group.push(candidate);
        }
        flush(&mut group, &mut merged);

        merged
    }

    fn extract_nodes(&self, polyline: &[Position], junctions: &[usize], floor_level: u32) -> Vec<Node> {
        let n = polyline.len();
        let junction_set: std::collections::HashSet<usize> = junctions.iter().copied().collect();
        let mut nodes = Vec::new();
        let mut last_emitted_position = polyline[0];

        nodes.push(self.new_node(polyline[0], NodeKind::Endpoint, floor_level, 0));

        for i in 1..n - 1 {
            if junction_set.contains(&i) {
                nodes.push(self.new_node(polyline[i], NodeKind::Junction, floor_level, i));
                last_emitted_position = polyline[i];
            } else if polyline[i].distance(&last_emitted_position) >= self.node_spacing {
                nodes.push(self.new_node(polyline[i], NodeKind::Waypoint, floor_level, i));
                last_emitted_position = polyline[i];
            }
        }

        nodes.push(self.new_node(polyline[n - 1], NodeKind::Endpoint, floor_level, n - 1));
        nodes
    }

    fn extract_edges(&self, polyline: &[Position], nodes: &[Node]) -> Vec<Edge> {
        let mut edges = Vec::new();
        for pair in nodes.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let distance = path_length(polyline, from.original_index, to.original_index);
            if distance > self.edge_connection_radius || distance <= 0.0 {
                continue;
            }
            edges.push(Edge {
                id: Uuid::new_v4().to_string(),
                from_node: from.id.clone(),
                to_node: to.id.clone(),
                distance,
                kind: EdgeKind::Horizontal,
                bidirectional: true,
            });
        }
        edges
    }

    fn new_node(&self, p: Position, kind: NodeKind, floor_level: u32, original_index: usize) -> Node {
        Node {
            id: Uuid::new_v4().to_string(),
            x: p.x,
            y: p.y,
            z: p.z,
            kind,
            floor_level,
            original_index,
        }
    }
}

/// Sum of consecutive point-to-point distances between `from` and `to`
/// (inclusive) along `polyline`.
fn path_length(polyline: &[Position], from: usize, to: usize) -> f64 {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    polyline[lo..=hi].windows(2).map(|w| w[0].distance(&w[1])).sum()
}
