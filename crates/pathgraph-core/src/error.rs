// crates/pathgraph-core/src/error.rs

//! Stable error boundary for the pipeline (§7).
//!
//! `EmptyTrajectory` is the only variant a caller must treat as fatal; every
//! other condition in §7's table is recorded as a non-fatal count in
//! [`crate::result::PipelineStats`] instead of surfacing as an `Err`.

use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    /// `PoseReader` yielded zero valid points after dropping degenerate
    /// records (absent/malformed/non-finite blob, or origin sentinel).
    #[error("pose store yielded no valid poses")]
    EmptyTrajectory,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
