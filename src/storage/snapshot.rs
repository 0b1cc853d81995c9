//! Snapshot Format
//!
//! On-disk representation of the keyword index. The whole association list is
//! written as one `bincode` document, replacing the previous snapshot via rename so
//! a crash mid-write never leaves a truncated index behind.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bumped whenever `Snapshot` changes shape.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    pub entries: Vec<SnapshotEntry>,
}

/// One keyword-to-path association, with the keyword exactly as it was indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotEntry {
    pub keyword: String,
    pub path: PathBuf,
}

impl Snapshot {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entries,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).context("Failed to encode index snapshot")
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot =
            bincode::deserialize(bytes).context("Failed to decode index snapshot")?;
        if snapshot.version != SNAPSHOT_VERSION {
            anyhow::bail!(
                "Unsupported snapshot version {} (expected {})",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        Ok(snapshot)
    }
}

pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(Snapshot::decode(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read snapshot {}", path.display())),
    }
}

/// Writes `snapshot` next to `path` and renames it into place.
///
/// The temporary file name is fixed, so concurrent writers to the same `path`
/// must be serialized by the caller.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = snapshot.encode()?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, &bytes)
        .with_context(|| format!("Failed to write snapshot {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace snapshot {}", path.display()))?;
    Ok(())
}
