// crates/pathgraph-pipeline/src/lib.rs

//! Stage implementations and the top-level orchestrator for turning a
//! decoded SLAM trajectory into a merged, per-floor indoor path graph
//! (§4–§6).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod cancel;
pub mod dedup;
pub mod error;
pub mod flatten;
pub mod floors;
pub mod graph;
pub mod merge;
pub mod outlier;
pub mod run;
pub mod vertical;

pub use cancel::CancellationToken;
pub use dedup::{DedupOutcome, Deduplicator};
pub use error::RunError;
pub use flatten::{Flattener, PcaFlattener, RdpFlattener};
pub use floors::{FloorSeparator, PassageFloorAssigner};
pub use graph::GraphBuilder;
pub use merge::{FloorGraphMerger, MergeResult};
pub use outlier::reject_outliers;
pub use run::{run, run_with, PipelineConfig};
pub use vertical::{VerticalDetectionResult, VerticalDetector};
