// crates/pathgraph-core/src/io.rs

//! Serialization helpers for [`PipelineResult`].
//!
//! JSON and CBOR read/write with extension-based auto-detection. Unknown or
//! missing extensions are rejected for reads and default to JSON for writes.

use crate::result::PipelineResult;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/// Read a [`PipelineResult`] from **JSON**.
pub fn read_result_json<P: AsRef<Path>>(path: P) -> Result<PipelineResult> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let rdr = BufReader::new(f);
    let v: PipelineResult =
        serde_json::from_reader(rdr).with_context(|| "deserialize JSON pipeline result")?;
    Ok(v)
}

/// Write a [`PipelineResult`] to **JSON** (pretty).
pub fn write_result_json<P: AsRef<Path>>(path: P, v: &PipelineResult) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let w = BufWriter::new(f);
    serde_json::to_writer_pretty(w, v).with_context(|| "serialize JSON pipeline result")?;
    Ok(())
}

/// Read a [`PipelineResult`] from **CBOR**.
pub fn read_result_cbor<P: AsRef<Path>>(path: P) -> Result<PipelineResult> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let mut rdr = BufReader::new(f);
    let v: PipelineResult =
        ciborium::de::from_reader(&mut rdr).with_context(|| "deserialize CBOR pipeline result")?;
    Ok(v)
}

/// Write a [`PipelineResult`] to **CBOR**.
pub fn write_result_cbor<P: AsRef<Path>>(path: P, v: &PipelineResult) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(v, &mut w).with_context(|| "serialize CBOR pipeline result")?;
    Ok(())
}

/// Auto-detect read by extension `.json` / `.cbor` (case-insensitive).
pub fn read_result_auto<P: AsRef<Path>>(path: P) -> Result<PipelineResult> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_result_json(path),
        Some("cbor") => read_result_cbor(path),
        Some(other) => Err(anyhow!(
            "unsupported result extension: {other} (supported: .json, .cbor)"
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Auto-detect write (defaults to **JSON** if unknown or missing).
pub fn write_result_auto<P: AsRef<Path>>(path: P, v: &PipelineResult) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => write_result_json(path, v),
        Some("cbor") => write_result_cbor(path, v),
        _ => write_result_json(path, v),
    }
}

fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
