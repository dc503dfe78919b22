// crates/pathgraph-geom/src/lib.rs

//! Small, dependency-light geometry substrate shared by the pipeline stages:
//! RDP polyline simplification, linear resampling, turning-angle
//! computation, a deterministic planar KD-tree, and 2D PCA via power
//! iteration.
//!
//! Kept intentionally small and self-contained, in the spirit of a tiny
//! numeric bootstrap crate other crates build on rather than a general
//! computational-geometry library.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod angle;
pub mod kdtree;
pub mod pca;
pub mod rdp;
pub mod resample;

pub use angle::turning_angle_degrees;
pub use kdtree::KdTree3;
pub use pca::pca_direction_2d;
pub use rdp::{perpendicular_distance, rdp_indices};
pub use resample::resample_segment;
