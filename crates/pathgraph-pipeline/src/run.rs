//! Top-level orchestrator (§5): one pass from a raw pose store to a
//! merged path graph, with cooperative cancellation checked at every
//! stage boundary and nothing else.
//!
//! Stage order: read poses → reject outliers → detect vertical passages
//! → separate floors → assign passages to floors → per floor, in
//! parallel: dedup → flatten → build graph → merge floors and stitch in
//! vertical edges.

use std::thread;

use anyhow::Result;
use pathgraph_core::{
    Bounds, Bounds3, Edge, FloorPath, Node, PathSegment, PipelineResult, PipelineStats, Position,
    VerticalPassageDoc,
};
use pathgraph_pose::PoseStore;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::dedup::Deduplicator;
use crate::error::RunError;
use crate::flatten::{Flattener, RdpFlattener};
use crate::floors::{FloorSeparator, PassageFloorAssigner};
use crate::graph::GraphBuilder;
use crate::merge::FloorGraphMerger;
use crate::outlier::reject_outliers;
use crate::vertical::VerticalDetector;

/// Every stage's tunable component, each defaulting to its own spec
/// default (§4 throughout). Generic over the flattener so a caller can
/// opt into [`crate::flatten::PcaFlattener`] without forking this type.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig<F: Flattener = RdpFlattener> {
    pub vertical: VerticalDetector,
    pub floors: FloorSeparator,
    pub dedup: Deduplicator,
    pub flattener: F,
    pub graph: GraphBuilder,
}

impl Default for PipelineConfig<RdpFlattener> {
    fn default() -> Self {
        Self {
            vertical: VerticalDetector::default(),
            floors: FloorSeparator::default(),
            dedup: Deduplicator::default(),
            flattener: RdpFlattener::default(),
            graph: GraphBuilder::default(),
        }
    }
}

/// Run the full pipeline over `store` with every stage at its default
/// configuration, checking `token` at every stage boundary.
///
/// # Errors
/// Propagates [`pathgraph_core::PipelineError::EmptyTrajectory`] if the
/// store yields no valid poses, and [`RunError::Cancelled`] if `token`
/// fires before the run completes.
pub fn run(store: &dyn PoseStore, token: &CancellationToken) -> Result<PipelineResult> {
    run_with(store, token, &PipelineConfig::default())
}

/// Like [`run`], but with an explicit [`PipelineConfig`].
///
/// # Errors
/// See [`run`].
pub fn run_with<F: Flattener + Sync>(
    store: &dyn PoseStore,
    token: &CancellationToken,
    config: &PipelineConfig<F>,
) -> Result<PipelineResult> {
    let (trajectory, pose_stats) = pathgraph_pose::read_poses(store)?;
    let total_nodes = trajectory.len();
    let mut stats = PipelineStats {
        degenerate_poses_dropped: pose_stats.degenerate_dropped,
        ..PipelineStats::default()
    };

    let (trajectory, outliers_dropped) = reject_outliers(&trajectory);
    stats.outliers_dropped = outliers_dropped;
    let positions: Vec<Position> = trajectory.iter().map(|r| r.position).collect();
    stats.trajectory_extents = Bounds3::of(positions.iter().copied());

    check(token)?;

    let vertical = config.vertical.detect(&positions);
    debug!(passages = vertical.passages.len(), "vertical detection complete");

    let mut non_vertical_positions = Vec::with_capacity(positions.len());
    let mut non_vertical_indices = Vec::with_capacity(positions.len());
    for (i, (&marked, &pos)) in vertical.vertical_mask.iter().zip(positions.iter()).enumerate() {
        if !marked {
            non_vertical_positions.push(pos);
            non_vertical_indices.push(i);
        }
    }

    let floors = config.floors.separate(&non_vertical_positions, &non_vertical_indices);
    let mut passages = vertical.passages;
    PassageFloorAssigner::assign(&floors, &mut passages);
    stats.floors_detected = floors.len();

    check(token)?;

    let positions_ref = &positions;
    let per_floor: Vec<FloorOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = floors
            .iter()
            .map(|floor| scope.spawn(move || build_floor(floor, positions_ref, config)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("per-floor dedup/flatten/graph stage panicked"))
            .collect()
    });

    check(token)?;

    stats.degenerate_thresholds_triggered =
        per_floor.iter().filter(|f| f.degenerate_triggered).count();

    let floor_paths: Vec<FloorPath> = per_floor.iter().map(|f| f.floor_path.clone()).collect();
    let per_floor_graphs: Vec<(Vec<Node>, Vec<Edge>)> = per_floor
        .into_iter()
        .map(|f| (f.nodes, f.edges))
        .collect();

    let merge_result = FloorGraphMerger.merge(per_floor_graphs, &passages, |p| {
        (positions[p.start], positions[p.end - 1])
    });
    stats.orphan_passages = merge_result.orphan_passages;
    stats.record_node_counts(&merge_result.nodes);
    stats.record_edge_lengths(&merge_result.edges);

    let vertical_passages: Vec<VerticalPassageDoc> = passages
        .iter()
        .map(|p| VerticalPassageDoc {
            kind: p.classification,
            from_floor_level: p.from_floor,
            to_floor_level: p.to_floor,
            direction: p.direction,
            segments: positions[p.start..p.end].to_vec(),
            entry_point: positions[p.start],
            exit_point: positions[p.end - 1],
        })
        .collect();

    let total_distance = stats.total_edge_length;

    info!(
        floors = stats.floors_detected,
        nodes = merge_result.nodes.len(),
        edges = merge_result.edges.len(),
        "pipeline run complete"
    );

    Ok(PipelineResult {
        total_nodes,
        total_distance,
        floor_paths,
        vertical_passages,
        path_nodes: merge_result.nodes,
        path_edges: merge_result.edges,
        stats,
    })
}

struct FloorOutcome {
    floor_path: FloorPath,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    degenerate_triggered: bool,
}

fn build_floor<F: Flattener>(
    floor: &pathgraph_core::Floor,
    positions: &[Position],
    config: &PipelineConfig<F>,
) -> FloorOutcome {
    let floor_positions: Vec<Position> =
        floor.original_indices.iter().map(|&i| positions[i]).collect();
    let outcome = config.dedup.run_tracked(&floor_positions, &floor.original_indices);
    let flattened = config.flattener.flatten(&outcome.points);
    let (nodes, edges) = config.graph.build(&flattened, floor.level);

    let segments: Vec<PathSegment> = flattened
        .windows(2)
        .enumerate()
        .map(|(i, w)| PathSegment {
            sequence_order: i as u32,
            start_point: w[0],
            end_point: w[1],
            length: w[0].distance(&w[1]),
        })
        .collect();
    let total_distance: f64 = segments.iter().map(|s| s.length).sum();
    let bounds = Bounds::of(flattened.iter().copied()).unwrap_or_default();

    FloorOutcome {
        floor_path: FloorPath {
            floor_level: floor.level,
            floor_name: None,
            segments,
            bounds,
            total_distance,
        },
        nodes,
        edges,
        degenerate_triggered: outcome.stage1_fallback_triggered || outcome.stage2_fallback_triggered,
    }
}

fn check(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        return Err(RunError::Cancelled.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathgraph_core::{EdgeKind, PipelineError, VerticalClass};
    use pathgraph_pose::{encode_pose_blob, InMemoryPoseStore};

    fn store_from(points: &[Position]) -> InMemoryPoseStore {
        InMemoryPoseStore::new(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as i64, Some(encode_pose_blob(*p).to_vec())))
                .collect(),
        )
    }

    #[test]
    fn s1_single_floor_straight_corridor_has_one_floor_and_both_endpoints() {
        // Jittery straight corridor over ~3m, one floor.
        let points: Vec<Position> = (0..30)
            .map(|i| {
                let jitter = if i % 2 == 0 { 0.02 } else { -0.02 };
                Position::new(i as f64 * 0.1, jitter, 0.0)
            })
            .collect();
        let store = store_from(&points);
        let result = run(&store, &CancellationToken::new()).expect("non-empty trajectory");

        assert_eq!(result.stats.floors_detected, 1);
        assert_eq!(result.floor_paths.len(), 1);
        assert!((result.floor_paths[0].total_distance - 2.9).abs() < 1.0);
        assert!(result.path_nodes.iter().any(|n| n.kind == pathgraph_core::NodeKind::Endpoint));
    }

    #[test]
    fn s3_back_and_forth_corridor_collapses_distance() {
        let mut points = Vec::new();
        for i in 0..=30 {
            points.push(Position::new(i as f64 / 6.0, 0.0, 0.0));
        }
        for i in (0..30).rev() {
            points.push(Position::new(i as f64 / 6.0, 0.0, 0.0));
        }
        let store = store_from(&points);
        let result = run(&store, &CancellationToken::new()).expect("non-empty trajectory");

        assert_eq!(result.stats.floors_detected, 1);
        assert!(result.total_distance < 9.0, "got {}", result.total_distance);
    }

    #[test]
    fn staircase_climb_between_two_floors_produces_a_vertical_edge() {
        let mut points = Vec::new();
        for i in 0..30 {
            points.push(Position::new(i as f64 * 0.1, 0.0, 0.0));
        }
        for i in 0..12 {
            let z = i as f64 * (3.0 / 11.0);
            points.push(Position::new(3.0 + i as f64 * 0.2, 0.0, z));
        }
        for i in 0..30 {
            points.push(Position::new(5.0 + i as f64 * 0.1, 0.0, 3.0));
        }
        let store = store_from(&points);
        let result = run(&store, &CancellationToken::new()).expect("non-empty trajectory");

        assert_eq!(result.stats.floors_detected, 2);
        assert_eq!(result.vertical_passages.len(), 1);
        assert_eq!(result.vertical_passages[0].kind, VerticalClass::Staircase);
        assert!(result
            .path_edges
            .iter()
            .any(|e| e.kind == EdgeKind::VerticalStaircase));
        assert_eq!(result.stats.orphan_passages, 0);
    }

    #[test]
    fn empty_store_is_the_only_fatal_case() {
        let store = InMemoryPoseStore::new(vec![]);
        let err = run(&store, &CancellationToken::new()).expect_err("must fail");
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::EmptyTrajectory)
        );
    }

    #[test]
    fn cancellation_before_the_run_aborts_with_no_partial_output() {
        let points: Vec<Position> = (0..30).map(|i| Position::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        let store = store_from(&points);
        let token = CancellationToken::new();
        token.cancel();

        let err = run(&store, &token).expect_err("must fail");
        assert_eq!(err.downcast_ref::<RunError>(), Some(&RunError::Cancelled));
    }

    #[test]
    fn node_original_index_is_strictly_increasing_per_floor() {
        // Invariant 1: within a floor, node original_index values strictly increase.
        let points: Vec<Position> = (0..60).map(|i| Position::new(i as f64 * 0.2, 0.0, 0.0)).collect();
        let store = store_from(&points);
        let result = run(&store, &CancellationToken::new()).expect("non-empty trajectory");

        for floor_level in 1..=result.stats.floors_detected as u32 {
            let indices: Vec<usize> = result
                .path_nodes
                .iter()
                .filter(|n| n.floor_level == floor_level)
                .map(|n| n.original_index)
                .collect();
            for w in indices.windows(2) {
                assert!(w[0] < w[1]);
            }
        }
    }
}
