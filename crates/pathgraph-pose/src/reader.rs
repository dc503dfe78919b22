//! PoseReader (§4.1): turns raw store rows into an ordered trajectory,
//! dropping degenerate records and failing fatally if nothing survives.

use crate::blob::{decode_pose_blob, DropReason};
use crate::store::PoseStore;
use anyhow::Result;
use pathgraph_core::{PipelineError, PoseRecord};
use tracing::{debug, warn};

/// Bookkeeping produced alongside the trajectory, folded into
/// [`pathgraph_core::PipelineStats`] by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseReadStats {
    /// Total rows seen in the store, including dropped ones.
    pub total_records: usize,
    /// Records dropped for any reason in [`DropReason`].
    pub degenerate_dropped: usize,
}

/// Read every row from `store`, decode it, and drop degenerate records
/// (§4.1). Returns the surviving trajectory in ascending-id order plus
/// read stats.
///
/// # Errors
/// Returns [`PipelineError::EmptyTrajectory`] if zero records survive
/// decoding, and propagates any I/O error from `store`.
pub fn read_poses(store: &dyn PoseStore) -> Result<(Vec<PoseRecord>, PoseReadStats)> {
    let raw_rows = store.raw_rows()?;
    let mut stats = PoseReadStats {
        total_records: raw_rows.len(),
        degenerate_dropped: 0,
    };

    let mut trajectory = Vec::with_capacity(raw_rows.len());
    for (id, blob) in raw_rows {
        match decode_pose_blob(blob.as_deref()) {
            Ok(position) => trajectory.push(PoseRecord { id, position }),
            Err(reason) => {
                stats.degenerate_dropped += 1;
                log_drop(id, reason);
            }
        }
    }

    if trajectory.is_empty() {
        warn!(total_records = stats.total_records, "pose store yielded no valid poses");
        return Err(PipelineError::EmptyTrajectory.into());
    }

    debug!(
        survived = trajectory.len(),
        dropped = stats.degenerate_dropped,
        "pose trajectory decoded"
    );
    Ok((trajectory, stats))
}

fn log_drop(id: i64, reason: DropReason) {
    debug!(id, ?reason, "dropped degenerate pose record");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::encode_pose_blob;
    use crate::store::InMemoryPoseStore;
    use pathgraph_core::Position;

    #[test]
    fn survives_mixed_valid_and_degenerate_rows() {
        let valid_a = encode_pose_blob(Position::new(1.0, 2.0, 0.0)).to_vec();
        let valid_b = encode_pose_blob(Position::new(3.0, 4.0, 0.0)).to_vec();
        let origin = encode_pose_blob(Position::new(0.0, 0.0, 0.0)).to_vec();
        let store = InMemoryPoseStore::new(vec![
            (1, Some(valid_a)),
            (2, None),
            (3, Some(origin)),
            (4, Some(valid_b)),
        ]);

        let (trajectory, stats) = read_poses(&store).expect("non-empty trajectory");
        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory[0].id, 1);
        assert_eq!(trajectory[1].id, 4);
        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.degenerate_dropped, 2);
    }

    #[test]
    fn all_degenerate_is_fatal() {
        let store = InMemoryPoseStore::new(vec![(1, None), (2, None)]);
        let err = read_poses(&store).expect_err("must fail");
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::EmptyTrajectory)
        );
    }

    #[test]
    fn empty_store_is_fatal() {
        let store = InMemoryPoseStore::new(vec![]);
        assert!(read_poses(&store).is_err());
    }
}
