//! The [`PoseStore`] trait and its adapters: an in-memory store for tests
//! and the synthetic generator, and a `rusqlite`-backed store for the
//! persisted pose database (§6 "Pose store format").

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// One raw row from the pose store: an id and its (possibly absent)
/// 48-byte blob, as they existed on disk — decoding happens later in
/// [`crate::reader`].
pub type RawPoseRow = (i64, Option<Vec<u8>>);

/// A read-only handle to a persisted pose store, yielding rows ordered by
/// ascending id.
pub trait PoseStore {
    /// All rows in ascending id order.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    fn raw_rows(&self) -> Result<Vec<RawPoseRow>>;
}

/// An in-memory pose store, used by tests and the synthetic trajectory
/// generator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPoseStore {
    rows: Vec<RawPoseRow>,
}

impl InMemoryPoseStore {
    /// Build a store from rows already in ascending-id order.
    #[must_use]
    pub fn new(rows: Vec<RawPoseRow>) -> Self {
        Self { rows }
    }
}

impl PoseStore for InMemoryPoseStore {
    fn raw_rows(&self) -> Result<Vec<RawPoseRow>> {
        Ok(self.rows.clone())
    }
}

/// A `rusqlite`-backed pose store reading a table `Node(id INTEGER, pose
/// BLOB)`, per §6's read contract.
pub struct SqlitePoseStore {
    conn: Connection,
}

impl SqlitePoseStore {
    /// Open an existing pose database file read-only.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened as a SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let conn = Connection::open_with_flags(
            path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .with_context(|| format!("open pose store {}", path_ref.display()))?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection (used by in-process tests that
    /// build a temporary SQLite database).
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl PoseStore for SqlitePoseStore {
    fn raw_rows(&self) -> Result<Vec<RawPoseRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, pose FROM Node ORDER BY id ASC")
            .context("prepare pose store query")?;
        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let pose: Option<Vec<u8>> = row.get(1)?;
                Ok((id, pose))
            })
            .context("query pose store rows")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read pose store row")?);
        }
        Ok(out)
    }
}

/// Write `rows` out as a fresh pose database file at `path`, creating the
/// `Node` table. Used by the CLI `simulate` subcommand and the benchmark
/// harness to persist a synthetic trajectory the same way a real capture
/// would be stored.
///
/// # Errors
/// Returns an error if the file cannot be created or the rows cannot be
/// inserted.
pub fn write_sqlite<P: AsRef<Path>>(path: P, rows: &[RawPoseRow]) -> Result<()> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        std::fs::remove_file(path_ref)
            .with_context(|| format!("remove existing pose store {}", path_ref.display()))?;
    }
    let conn = Connection::open(path_ref)
        .with_context(|| format!("create pose store {}", path_ref.display()))?;
    conn.execute("CREATE TABLE Node (id INTEGER PRIMARY KEY, pose BLOB)", [])
        .context("create Node table")?;

    let tx = conn.unchecked_transaction().context("begin pose store write")?;
    {
        let mut stmt = tx
            .prepare("INSERT INTO Node (id, pose) VALUES (?1, ?2)")
            .context("prepare pose store insert")?;
        for (id, pose) in rows {
            stmt.execute(rusqlite::params![id, pose]).context("insert pose row")?;
        }
    }
    tx.commit().context("commit pose store write")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::encode_pose_blob;
    use pathgraph_core::Position;

    fn temp_db() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory sqlite");
        conn.execute("CREATE TABLE Node (id INTEGER PRIMARY KEY, pose BLOB)", [])
            .expect("create Node table");
        conn
    }

    #[test]
    fn sqlite_store_reads_rows_in_ascending_id_order() {
        let conn = temp_db();
        let blob_a = encode_pose_blob(Position::new(1.0, 0.0, 0.0));
        let blob_b = encode_pose_blob(Position::new(2.0, 0.0, 0.0));
        conn.execute(
            "INSERT INTO Node (id, pose) VALUES (2, ?1), (1, ?2)",
            rusqlite::params![blob_b.to_vec(), blob_a.to_vec()],
        )
        .expect("insert rows");

        let store = SqlitePoseStore::from_connection(conn);
        let rows = store.raw_rows().expect("read rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[1].0, 2);
    }

    #[test]
    fn sqlite_store_preserves_null_blobs() {
        let conn = temp_db();
        conn.execute("INSERT INTO Node (id, pose) VALUES (1, NULL)", [])
            .expect("insert row");
        let store = SqlitePoseStore::from_connection(conn);
        let rows = store.raw_rows().expect("read rows");
        assert_eq!(rows, vec![(1, None)]);
    }

    #[test]
    fn in_memory_store_returns_rows_verbatim() {
        let store = InMemoryPoseStore::new(vec![(1, None), (2, Some(vec![0u8; 48]))]);
        let rows = store.raw_rows().expect("read rows");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn write_sqlite_roundtrips_through_open() {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock")
            .as_nanos();
        path.push(format!("pathgraph_pose_write_sqlite_{nanos}.db"));

        let blob = encode_pose_blob(Position::new(1.0, 2.0, 0.0)).to_vec();
        let rows = vec![(1_i64, Some(blob)), (2_i64, None)];
        write_sqlite(&path, &rows).expect("write pose store");

        let store = SqlitePoseStore::open(&path).expect("open pose store");
        let read_back = store.raw_rows().expect("read rows");
        assert_eq!(read_back, rows);

        let _ = std::fs::remove_file(&path);
    }
}
