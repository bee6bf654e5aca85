//! Snapshot and cache errors.
use std::io::Error;

use crate::graph::error::BuildError;
use crate::raw::RawTableError;

/// A snapshot that could not be read or written. Never fatal to
/// [`load`](super::load): the graph is rebuilt from the raw table instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// I/O error on the snapshot file
    #[error("I/O error on snapshot '{0}'")]
    Io(String, #[source] Error),

    /// File is shorter than the snapshot header
    #[error("Snapshot is truncated ({0} bytes)")]
    Truncated(usize),

    /// File does not start with the snapshot magic
    #[error("Not a snapshot file (magic {0:?})")]
    BadMagic([u8; 4]),

    /// Snapshot written by an incompatible version
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// Body could not be encoded or decoded, including bodies whose node
    /// table is inconsistent
    #[error("Invalid snapshot body")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Whether the snapshot simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::Io(_, e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Errors that leave [`load`](super::load) without a graph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    /// Raw composition table could not be read
    #[error("Failed to read raw composition table")]
    RawTable(#[from] RawTableError),

    /// Raw composition table could not be turned into a graph
    #[error("Failed to build decomposition graph")]
    Build(#[from] BuildError),
}
