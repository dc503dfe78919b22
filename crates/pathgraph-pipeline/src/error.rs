//! Pipeline-level error boundary, layered over [`pathgraph_core::PipelineError`].
//!
//! `EmptyTrajectory` propagates straight through from `pathgraph-pose`;
//! `Cancelled` is the only error this crate itself introduces, raised when
//! a [`crate::cancel::CancellationToken`] fires between stages (§5).

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    /// A [`crate::cancel::CancellationToken`] was observed cancelled at a
    /// stage boundary; the run was aborted with no partial output.
    #[error("pipeline run cancelled")]
    Cancelled,
}
