// crates/pathgraph-core/src/constants.rs

//! Named numeric tolerances for the pipeline stages (§4), gathered in one
//! place so every crate in the workspace reads the same defaults.

/// VerticalDetector: sliding window size (points).
pub const VERTICAL_WINDOW: usize = 10;
/// VerticalDetector / Floor: minimum total |Δz| for a passage to survive.
pub const MIN_TOTAL_Z_CHANGE: f64 = 1.5;
/// VerticalDetector: per-step Z-change significance threshold (meters).
pub const Z_CHANGE_THRESHOLD: f64 = 0.05;
/// VerticalDetector: minimum contiguous vertical run length (points).
pub const MIN_STAIR_POINTS: usize = 5;
/// VerticalPassage invariant: minimum `end - start` (points).
pub const MIN_PASSAGE_POINTS: usize = MIN_STAIR_POINTS;
/// VerticalDetector: merge adjacent same-direction passages within this
/// index gap (inclusive boundary preserved from the original: `gap < 10`).
pub const PASSAGE_MERGE_GAP: usize = 10;
/// FloorSeparator: minimum Z-range before we bother histogramming at all.
pub const FLOOR_HEIGHT: f64 = 3.0;
/// FloorSeparator: minimum points for a surviving floor cluster.
pub const MIN_POINTS_PER_FLOOR: usize = 10;
/// FloorSeparator: histogram bin width (meters).
pub const FLOOR_HIST_BIN_WIDTH: f64 = 0.5;
/// FloorSeparator: minimum bin count.
pub const FLOOR_HIST_MIN_BINS: usize = 20;
/// FloorSeparator: Gaussian smoothing sigma, in bins.
pub const FLOOR_HIST_SIGMA_BINS: f64 = 1.5;
/// FloorSeparator: bin is "significant" at this fraction of total points.
pub const FLOOR_HIST_SIGNIFICANT_FRACTION: f64 = 0.03;
/// FloorSeparator: max bin gap to still group into one region.
pub const FLOOR_HIST_REGION_GAP: usize = 2;
/// FloorSeparator: peak separation as a fraction of `FLOOR_HEIGHT`.
pub const FLOOR_PEAK_SEPARATION_FRACTION: f64 = 0.7;

/// Deduplicator stage 1: back-and-forth overlap detection radius (meters).
pub const DEDUP_OVERLAP_THRESHOLD: f64 = 1.0;
/// Deduplicator stage 2: spatial dedup radius (meters).
pub const DEDUP_DISTANCE_THRESHOLD: f64 = 0.5;

/// PathFlattener: gap beyond which a floor's points are split into separate
/// runs that are never bridged.
pub const GAP_THRESHOLD: f64 = 5.0;
/// PathFlattener: default RDP epsilon (meters).
pub const RDP_EPSILON: f64 = 0.5;
/// PathFlattener: default linear resampling spacing (meters).
pub const RESAMPLE_SPACING: f64 = 0.5;

/// GraphBuilder: minimum turning angle (degrees) for a junction candidate.
pub const JUNCTION_ANGLE_DEGREES: f64 = 45.0;
/// GraphBuilder: neighbor count required on each side of a junction
/// candidate index.
pub const JUNCTION_NEIGHBOR_SPAN: usize = 3;
/// GraphBuilder: junction candidates within this radius are merged.
pub const JUNCTION_MERGE_RADIUS: f64 = 1.5;
/// GraphBuilder: minimum spacing between emitted waypoint nodes (meters).
pub const NODE_SPACING: f64 = 1.0;
/// GraphBuilder: edges longer than this are dropped as a polyline split.
pub const EDGE_CONNECTION_RADIUS: f64 = 3.0;

/// Outlier pre-pass: a single-frame jump beyond this is physically
/// implausible for SLAM and is dropped before vertical detection runs.
pub const OUTLIER_JUMP_THRESHOLD: f64 = 10.0;

/// PoseReader: a translation within this of the origin on every axis is the
/// store's sentinel for "uninitialized".
pub const ORIGIN_SENTINEL_EPSILON: f64 = 1e-6;
