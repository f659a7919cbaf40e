//! Snapshot persistence for the semantic index.
//!
//! The snapshot is a single JSON document written atomically (temp file in
//! the target directory, then rename), so a crash mid-write leaves the
//! previous snapshot intact.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{IndexError, IndexResult};
use super::model::CacheEntry;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub dimension: Option<usize>,
    pub entries: Vec<CacheEntry>,
}

pub(crate) fn read_snapshot(path: &Path) -> IndexResult<Snapshot> {
    if !path.exists() {
        return Err(IndexError::SnapshotNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| IndexError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|e| IndexError::SnapshotCorrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub(crate) fn write_snapshot(path: &Path, snapshot: &Snapshot) -> IndexResult<()> {
    let io_err = |source| IndexError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_err)?;

    let bytes = serde_json::to_vec(snapshot).map_err(|e| IndexError::SnapshotCorrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Temp file must live in the same directory for the rename to be atomic.
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path)
        .map_err(|e| IndexError::SnapshotIo {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}
