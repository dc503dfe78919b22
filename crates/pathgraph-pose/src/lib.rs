// crates/pathgraph-pose/src/lib.rs

//! Pose store access: the 48-byte blob format (§4.1), `PoseStore`
//! adapters (in-memory and SQLite), the PoseReader that turns a raw
//! store into a decoded trajectory, and a synthetic trajectory
//! generator for tests, benches, and the CLI `simulate` subcommand.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod blob;
pub mod generator;
pub mod reader;
pub mod store;

pub use blob::{decode_pose_blob, encode_pose_blob, DropReason, POSE_BLOB_LEN};
pub use generator::{generate_trajectory, GeneratorConfig};
pub use reader::{read_poses, PoseReadStats};
pub use store::{write_sqlite, InMemoryPoseStore, PoseStore, RawPoseRow, SqlitePoseStore};
