//! Pose-blob decoding (§4.1).
//!
//! A pose blob is a row-major 3x4 affine matrix stored as 12 consecutive
//! little-endian IEEE-754 `f32` values; the translation is column 3 and
//! becomes the [`Position`]. A record is dropped (not an error — just
//! excluded from the trajectory) when the blob is missing, the wrong
//! length, fails to unpack, carries a non-finite component, or its
//! translation sits within [`ORIGIN_SENTINEL_EPSILON`] of the origin on
//! every axis (the store's sentinel for "uninitialized").

use pathgraph_core::{constants::ORIGIN_SENTINEL_EPSILON, Position};

/// Expected blob length in bytes: 12 little-endian `f32`s.
pub const POSE_BLOB_LEN: usize = 48;

/// Why a single pose record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No blob was stored for this id.
    Absent,
    /// The blob was not exactly [`POSE_BLOB_LEN`] bytes.
    WrongLength,
    /// One or more of the 12 decoded floats is NaN or infinite.
    NonFinite,
    /// Translation lies within `ORIGIN_SENTINEL_EPSILON` of `(0, 0, 0)`.
    OriginSentinel,
}

/// Decode one pose record into its translation, or report why it was
/// dropped.
#[must_use]
pub fn decode_pose_blob(blob: Option<&[u8]>) -> Result<Position, DropReason> {
    let blob = blob.ok_or(DropReason::Absent)?;
    if blob.len() != POSE_BLOB_LEN {
        return Err(DropReason::WrongLength);
    }

    let mut values = [0.0_f32; 12];
    for (i, chunk) in blob.chunks_exact(4).enumerate() {
        let bytes: [u8; 4] = chunk.try_into().map_err(|_| DropReason::WrongLength)?;
        values[i] = f32::from_le_bytes(bytes);
    }

    if values.iter().any(|v| !v.is_finite()) {
        return Err(DropReason::NonFinite);
    }

    // Row-major 3x4: rows are [r0 r1 r2 tx] [r3 r4 r5 ty] [r6 r7 r8 tz].
    let tx = f64::from(values[3]);
    let ty = f64::from(values[7]);
    let tz = f64::from(values[11]);

    if tx.abs() < ORIGIN_SENTINEL_EPSILON
        && ty.abs() < ORIGIN_SENTINEL_EPSILON
        && tz.abs() < ORIGIN_SENTINEL_EPSILON
    {
        return Err(DropReason::OriginSentinel);
    }

    Ok(Position::new(tx, ty, tz))
}

/// Encode a [`Position`] into a 48-byte blob with an identity rotation
/// block, for test fixtures and the synthetic generator.
#[must_use]
pub fn encode_pose_blob(p: Position) -> [u8; POSE_BLOB_LEN] {
    #[rustfmt::skip]
    let rows: [f32; 12] = [
        1.0, 0.0, 0.0, p.x as f32,
        0.0, 1.0, 0.0, p.y as f32,
        0.0, 0.0, 1.0, p.z as f32,
    ];
    let mut out = [0u8; POSE_BLOB_LEN];
    for (i, v) in rows.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
    }
    out
}
