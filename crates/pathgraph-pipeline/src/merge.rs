//! FloorGraphMerger (§4.8): unions per-floor graphs and stitches in
//! cross-floor VERTICAL_* edges at passage entry/exit points.

use pathgraph_core::{Edge, EdgeKind, Node, Position, VerticalClass, VerticalPassage};
use uuid::Uuid;

/// Unions per-floor node/edge sets and adds one cross-floor edge per
/// vertical passage that resolves to real nodes on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloorGraphMerger;

/// Outcome of merging: the unified node/edge sets, plus the number of
/// passages that could not be stitched in (§4.9 "OrphanPassage").
#[derive(Debug, Default)]
pub struct MergeResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub orphan_passages: usize,
}

impl FloorGraphMerger {
    /// Merge `per_floor` node/edge pairs (already in ascending floor-level
    /// order) and stitch in `passages`. `entry_position`/`exit_position`
    /// are looked up per passage by the caller (the raw trajectory
    /// positions at `passage.start` / `passage.end - 1`).
    #[must_use]
    pub fn merge(
        &self,
        per_floor: Vec<(Vec<Node>, Vec<Edge>)>,
        passages: &[VerticalPassage],
        entry_exit: impl Fn(&VerticalPassage) -> (Position, Position),
    ) -> MergeResult {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for (floor_nodes, floor_edges) in per_floor {
            nodes.extend(floor_nodes);
            edges.extend(floor_edges);
        }

        let mut orphan_passages = 0usize;
        for passage in passages {
            let (entry_pos, exit_pos) = entry_exit(passage);
            let from_node = nearest_on_floor(&nodes, passage.from_floor, entry_pos);
            let to_node = nearest_on_floor(&nodes, passage.to_floor, exit_pos);

            match (from_node, to_node) {
                (Some(from), Some(to)) => {
                    let kind = match passage.classification {
                        VerticalClass::Staircase => EdgeKind::VerticalStaircase,
                        VerticalClass::Elevator => EdgeKind::VerticalElevator,
                    };
                    edges.push(Edge {
                        id: Uuid::new_v4().to_string(),
                        from_node: from.id.clone(),
                        to_node: to.id.clone(),
                        distance: passage.z_displacement(),
                        kind,
                        bidirectional: true,
                    });
                }
                _ => orphan_passages += 1,
            }
        }

        MergeResult { nodes, edges, orphan_passages }
    }
}

fn nearest_on_floor(nodes: &[Node], floor_level: i32, target: Position) -> Option<&Node> {
    if floor_level <= 0 {
        return None;
    }
    let floor_level = floor_level as u32;
    nodes
        .iter()
        .filter(|n| n.floor_level == floor_level)
        .min_by(|a, b| {
            a.position()
                .distance(&target)
                .partial_cmp(&b.position().distance(&target))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
