// crates/pathgraph-core/src/lib.rs

//! Core data types, error kinds, numeric constants, and result I/O for the
//! trajectory-to-graph indoor path pipeline.
//!
//! This crate owns no algorithm: it is the stable vocabulary
//! (`Position`, `Node`, `Edge`, `PipelineResult`, ...) that
//! `pathgraph-pose`, `pathgraph-geom`, and `pathgraph-pipeline` build on.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod constants;
pub mod error;
pub mod io;
pub mod result;
pub mod types;

pub use error::{PipelineError, Result};
pub use result::{
    Bounds, Bounds3, FloorPath, PathSegment, PipelineResult, PipelineStats, VerticalPassageDoc,
};
pub use types::{
    Edge, EdgeKind, Floor, Node, NodeKind, PoseRecord, Position, VerticalClass, VerticalDirection,
    VerticalPassage, UNKNOWN_FLOOR,
};
