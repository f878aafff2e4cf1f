//! Dataset snapshot files
//!
//! A snapshot is one JSON document per dataset:
//!
//! ```text
//! {"id": "sections", "kind": "sections", "records": [ ... ]}
//! ```
//!
//! Snapshots live in a flat directory as `<id>.json`. Files are read in
//! file name order so loading is deterministic.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::{DatasetKind, DatasetRecords, Room, Section};

use super::errors::{CatalogError, CatalogResult};

/// A dataset read from disk
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub id: String,
    pub records: DatasetRecords,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    id: String,
    kind: DatasetKind,
    records: Value,
}

#[derive(Serialize)]
struct SnapshotFileRef<'a, T: Serialize> {
    id: &'a str,
    kind: DatasetKind,
    records: &'a [T],
}

/// Decodes a JSON array of records of the given kind.
pub fn records_from_value(kind: DatasetKind, records: Value) -> serde_json::Result<DatasetRecords> {
    match kind {
        DatasetKind::Sections => {
            serde_json::from_value::<Vec<Section>>(records).map(DatasetRecords::from)
        }
        DatasetKind::Rooms => serde_json::from_value::<Vec<Room>>(records).map(DatasetRecords::from),
    }
}

/// Reads one snapshot file.
pub fn load_snapshot(path: &Path) -> CatalogResult<DatasetSnapshot> {
    let bytes = fs::read(path)?;
    let file: SnapshotFile =
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::invalid_snapshot(path, e))?;

    let records = records_from_value(file.kind, file.records)
        .map_err(|e| CatalogError::invalid_snapshot(path, e))?;

    Ok(DatasetSnapshot {
        id: file.id,
        records,
    })
}

/// Reads every `*.json` file in `dir`, sorted by file name.
pub fn load_snapshots(dir: &Path) -> CatalogResult<Vec<DatasetSnapshot>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| load_snapshot(p)).collect()
}

/// Writes `records` to `<dir>/<id>.json` and returns the path.
///
/// The file is written to a temporary name first and renamed into place.
pub fn save_snapshot(dir: &Path, id: &str, records: &DatasetRecords) -> CatalogResult<PathBuf> {
    let path = snapshot_path(dir, id)?;
    let tmp_path = dir.join(format!("{}.json.tmp", id));
    fs::create_dir_all(dir)?;

    let kind = records.kind();
    let bytes = match records {
        DatasetRecords::Sections(rows) => serde_json::to_vec(&SnapshotFileRef {
            id,
            kind,
            records: rows,
        }),
        DatasetRecords::Rooms(rows) => serde_json::to_vec(&SnapshotFileRef {
            id,
            kind,
            records: rows,
        }),
    }
    .map_err(|e| CatalogError::invalid_snapshot(&path, e))?;

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// Deletes `<dir>/<id>.json`. Returns false if there was no such file.
pub fn remove_snapshot(dir: &Path, id: &str) -> CatalogResult<bool> {
    let path = snapshot_path(dir, id)?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// True when `id` names a file directly inside a directory: one normal
/// path component, no separators of either platform.
pub(crate) fn is_plain_file_name(id: &str) -> bool {
    if id.contains('/') || id.contains('\\') {
        return false;
    }
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn snapshot_path(dir: &Path, id: &str) -> CatalogResult<PathBuf> {
    if !is_plain_file_name(id) {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(dir.join(format!("{}.json", id)))
}
