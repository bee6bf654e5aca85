//! Loading a graph from its snapshot, rebuilding it from the raw composition
//! table when the snapshot is missing or unusable.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::graph::DecompositionGraph;
use crate::paths;
use crate::raw::RawTable;

pub mod error;
pub mod snapshot;

pub use self::error::{CacheError, SnapshotError};

/// Where the raw table and the snapshot live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Raw composition table (JSON)
    pub raw_path: PathBuf,
    /// Snapshot of the built graph
    pub snapshot_path: PathBuf,
    /// Ignore any existing snapshot and rebuild
    pub rebuild: bool,
}

impl CacheConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(raw_path: P, snapshot_path: Q) -> CacheConfig {
        CacheConfig {
            raw_path: raw_path.into(),
            snapshot_path: snapshot_path.into(),
            rebuild: false,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig::new(paths::raw_table_path(), paths::snapshot_path())
    }
}

/// Loads the graph described by `config`.
///
/// A readable snapshot is used as is. Otherwise the graph is built from the
/// raw table and the snapshot (re)written; failing to write it only logs a
/// warning. Only an unusable raw table is an error.
pub fn load(config: &CacheConfig) -> Result<DecompositionGraph, CacheError> {
    if !config.rebuild {
        match snapshot::read(&config.snapshot_path) {
            Ok(graph) => return Ok(graph),
            Err(e) if e.is_not_found() => {
                log::info!(
                    "No snapshot at {}, building from {}",
                    config.snapshot_path.display(),
                    config.raw_path.display()
                );
            }
            Err(e) => {
                log::warn!(
                    "Discarding snapshot {}: {}",
                    config.snapshot_path.display(),
                    e
                );
            }
        }
    }

    let graph = rebuild(&config.raw_path)?;

    if let Err(e) = save(&graph, &config.snapshot_path) {
        log::warn!(
            "Could not write snapshot {}: {}",
            config.snapshot_path.display(),
            e
        );
    }

    Ok(graph)
}

/// Builds a graph straight from the raw table at `raw_path`.
pub fn rebuild<P: AsRef<Path>>(raw_path: P) -> Result<DecompositionGraph, CacheError> {
    let raw = RawTable::from_path(raw_path)?;
    Ok(DecompositionGraph::from_raw(&raw)?)
}

/// Persists `graph` at `path`, replacing any previous snapshot.
pub fn save<P: AsRef<Path>>(graph: &DecompositionGraph, path: P) -> Result<(), SnapshotError> {
    snapshot::write(graph, path)
}
