// crates/pathgraph-core/src/types.rs

//! Canonical data model shared across the pathgraph workspace.
//!
//! These live in `pathgraph-core` and are re-exported at the crate root so
//! other crates import via `pathgraph_core::Position`, `pathgraph_core::Node`,
//! etc.

use serde::{Deserialize, Serialize};

/// A 3D point in meters, right-handed, Z = vertical (gravity-aligned).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (XY) Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn xy_distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3D Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A pose as read from the pose store: a stable id paired with a decoded
/// translation. Ordering by `id` equals ordering by capture time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PoseRecord {
    pub id: i64,
    pub position: Position,
}

/// Direction of travel for a vertical passage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VerticalDirection {
    Up,
    Down,
}

/// Classification of a detected vertical passage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VerticalClass {
    Staircase,
    Elevator,
}

/// Sentinel floor level meaning "no floor could be matched".
pub const UNKNOWN_FLOOR: i32 = 0;

/// A contiguous `[start, end)` index range over the original trajectory
/// classified as sustained vertical motion (stairs or an elevator).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VerticalPassage {
    pub start: usize,
    pub end: usize,
    pub classification: VerticalClass,
    pub z_start: f64,
    pub z_end: f64,
    pub xy_length: f64,
    pub direction: VerticalDirection,
    /// `UNKNOWN_FLOOR` until `PassageFloorAssigner` runs.
    pub from_floor: i32,
    /// `UNKNOWN_FLOOR` until `PassageFloorAssigner` runs.
    pub to_floor: i32,
}

impl VerticalPassage {
    #[inline]
    #[must_use]
    pub fn z_displacement(&self) -> f64 {
        (self.z_end - self.z_start).abs()
    }

    #[inline]
    #[must_use]
    pub fn xy_z_ratio(&self) -> f64 {
        let dz = self.z_displacement();
        if dz <= 0.0 {
            f64::INFINITY
        } else {
            self.xy_length / dz
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A Z-histogram peak cluster of non-passage points, 1-based, ascending by
/// `z_mean` (1 = lowest detected floor).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Floor {
    pub level: u32,
    /// Original-trajectory indices of the points backing this floor, in
    /// ascending order.
    pub original_indices: Vec<usize>,
    pub points: Vec<Position>,
    pub z_mean: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Floor {
    #[inline]
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// The kind of a graph node.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Endpoint,
    Waypoint,
    Junction,
    /// Dead end with no continuation; reserved for a future POI-detection
    /// pass (not emitted by the current `GraphBuilder`).
    PoiCandidate,
    /// Reserved: the nearest existing node is reused at passage boundaries
    /// today (see `FloorGraphMerger`), so this kind is never constructed.
    PassageEntry,
    /// See `PassageEntry`.
    PassageExit,
}

/// A routable point in the merged graph.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub kind: NodeKind,
    pub floor_level: u32,
    pub original_index: usize,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// The kind of a graph edge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Horizontal,
    VerticalStaircase,
    VerticalElevator,
}

/// A routable connection between two nodes. `distance` is the path-length
/// sum of segment lengths between the endpoints, not straight-line distance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub distance: f64,
    pub kind: EdgeKind,
    pub bidirectional: bool,
}
