// crates/pathgraph-core/src/result.rs

//! The pipeline's emit contract (§6): a single document describing the
//! merged path graph, ready for serialization to the caller.

use crate::types::{Edge, EdgeKind, Node, Position, VerticalClass, VerticalDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis-aligned planar bounds.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    #[must_use]
    pub fn of(points: impl IntoIterator<Item = Position>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }
}

/// Full 3D bounds, used for the trajectory-extents stat.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Bounds3 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds3 {
    #[must_use]
    pub fn of(points: impl IntoIterator<Item = Position>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            min_z: first.z,
            max_z: first.z,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
            b.min_z = b.min_z.min(p.z);
            b.max_z = b.max_z.max(p.z);
        }
        Some(b)
    }
}

/// One straight-line piece of a floor's flattened polyline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PathSegment {
    pub sequence_order: u32,
    pub start_point: Position,
    pub end_point: Position,
    pub length: f64,
}

/// The per-floor portion of the emitted result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FloorPath {
    pub floor_level: u32,
    /// Presentation-only name (see §9 Design Notes); `None` in a pure-core
    /// response, filled in by a presentation adapter if one is layered on
    /// top. When present, uses the `"{n}층"` / `"B{|n|}"` convention.
    pub floor_name: Option<String>,
    pub segments: Vec<PathSegment>,
    pub bounds: Bounds,
    pub total_distance: f64,
}

/// A vertical passage as reported in the result document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VerticalPassageDoc {
    #[serde(rename = "type")]
    pub kind: VerticalClass,
    pub from_floor_level: i32,
    pub to_floor_level: i32,
    pub direction: VerticalDirection,
    /// The raw trajectory positions spanned by this passage, in order.
    pub segments: Vec<Position>,
    pub entry_point: Position,
    pub exit_point: Position,
}

/// Counts and non-fatal diagnostics accumulated across the whole run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineStats {
    pub node_counts_by_kind: HashMap<String, usize>,
    pub total_edge_length: f64,
    pub average_edge_length: f64,
    pub junction_count: usize,
    pub endpoint_count: usize,
    pub waypoint_count: usize,
    pub floors_detected: usize,
    pub trajectory_extents: Option<Bounds3>,
    /// Poses dropped by `PoseReader` (absent/malformed/non-finite/origin).
    pub degenerate_poses_dropped: usize,
    /// Points dropped by the outlier pre-pass (§4).
    pub outliers_dropped: usize,
    /// Vertical passages that had no matching floor node on one or both
    /// ends and were therefore skipped (§4.9 `OrphanPassage`).
    pub orphan_passages: usize,
    /// Floors for which the deduplicator's safety fallback triggered
    /// (would have dropped below 2 points; input returned unchanged).
    pub degenerate_thresholds_triggered: usize,
}

impl PipelineStats {
    pub fn record_node_counts(&mut self, nodes: &[Node]) {
        self.node_counts_by_kind.clear();
        self.junction_count = 0;
        self.endpoint_count = 0;
        self.waypoint_count = 0;
        for n in nodes {
            let key = format!("{:?}", n.kind);
            *self.node_counts_by_kind.entry(key).or_insert(0) += 1;
            match n.kind {
                crate::types::NodeKind::Junction => self.junction_count += 1,
                crate::types::NodeKind::Endpoint => self.endpoint_count += 1,
                crate::types::NodeKind::Waypoint => self.waypoint_count += 1,
                _ => {}
            }
        }
    }

    pub fn record_edge_lengths(&mut self, edges: &[Edge]) {
        let horizontal: Vec<f64> = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Horizontal)
            .map(|e| e.distance)
            .collect();
        self.total_edge_length = horizontal.iter().sum();
        self.average_edge_length = if horizontal.is_empty() {
            0.0
        } else {
            self.total_edge_length / horizontal.len() as f64
        };
    }
}

/// The full pipeline result document (§6 emit contract).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PipelineResult {
    pub total_nodes: usize,
    pub total_distance: f64,
    pub floor_paths: Vec<FloorPath>,
    pub vertical_passages: Vec<VerticalPassageDoc>,
    pub path_nodes: Vec<Node>,
    pub path_edges: Vec<Edge>,
    pub stats: PipelineStats,
}

impl PipelineResult {
    #[must_use]
    pub fn empty(total_nodes: usize) -> Self {
        Self {
            total_nodes,
            total_distance: 0.0,
            floor_paths: Vec::new(),
            vertical_passages: Vec::new(),
            path_nodes: Vec::new(),
            path_edges: Vec::new(),
            stats: PipelineStats::default(),
        }
    }
}
