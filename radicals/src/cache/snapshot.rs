//! On-disk snapshot of a built graph.
//!
//! Layout: the four magic bytes `RADG`, a little-endian `u32` format version,
//! then the node table as JSON. The file is memory mapped for reading and
//! written through a temporary file in the same directory, so readers never
//! observe a half-written snapshot.
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use memmap2::Mmap;
use tempfile::NamedTempFile;

use super::error::SnapshotError;
use crate::constants::{SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::graph::DecompositionGraph;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |e| SnapshotError::Io(path.display().to_string(), e)
}

/// Checks the header and returns the format version it carries.
pub(crate) fn read_header(buf: &[u8]) -> Result<u32, SnapshotError> {
    if buf.len() < SNAPSHOT_HEADER_SIZE {
        return Err(SnapshotError::Truncated(buf.len()));
    }

    let mut rdr = Cursor::new(buf);

    let mut magic = [0u8; 4];
    rdr.read_exact(&mut magic)
        .map_err(|_| SnapshotError::Truncated(buf.len()))?;

    if magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic(magic));
    }

    let version = rdr
        .read_u32::<LittleEndian>()
        .map_err(|_| SnapshotError::Truncated(buf.len()))?;

    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    Ok(version)
}

pub(crate) fn write_header<W: Write>(mut w: W) -> std::io::Result<()> {
    w.write_all(&SNAPSHOT_MAGIC)?;
    w.write_u32::<LittleEndian>(SNAPSHOT_VERSION)
}

/// Reads a snapshot written by [`write`].
pub fn read<P: AsRef<Path>>(path: P) -> Result<DecompositionGraph, SnapshotError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(path))?;
    let len = file.metadata().map_err(io_error(path))?.len() as usize;

    // Zero-length files cannot be mapped.
    if len < SNAPSHOT_HEADER_SIZE {
        return Err(SnapshotError::Truncated(len));
    }

    let mmap = unsafe { Mmap::map(&file).map_err(io_error(path))? };
    read_header(&mmap)?;

    let graph: DecompositionGraph = serde_json::from_slice(&mmap[SNAPSHOT_HEADER_SIZE..])?;
    log::debug!(
        "Loaded snapshot {}: {} nodes",
        path.display(),
        graph.len()
    );

    Ok(graph)
}

/// Atomically replaces the snapshot at `path` with `graph`.
pub fn write<P: AsRef<Path>>(graph: &DecompositionGraph, path: P) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(path))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_header(&mut writer).map_err(io_error(path))?;
        serde_json::to_writer(&mut writer, graph)?;
        writer.flush().map_err(io_error(path))?;
    }

    tmp.persist(path).map_err(|e| io_error(path)(e.error))?;
    log::debug!(
        "Wrote snapshot {}: {} nodes",
        path.display(),
        graph.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{graph, HAO};

    #[test]
    fn test_header() {
        let mut buf = vec![];
        write_header(&mut buf).unwrap();

        assert_eq!(buf.len(), SNAPSHOT_HEADER_SIZE);
        assert_eq!(&buf[..4], b"RADG");
        assert_eq!(read_header(&buf).unwrap(), SNAPSHOT_VERSION);
    }

    #[test]
    fn test_bad_headers() {
        assert!(matches!(read_header(b"RAD"), Err(SnapshotError::Truncated(3))));
        assert!(matches!(
            read_header(b"JSON\x01\x00\x00\x00"),
            Err(SnapshotError::BadMagic(m)) if &m == b"JSON"
        ));
        assert!(matches!(
            read_header(b"RADG\x09\x00\x00\x00"),
            Err(SnapshotError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.snapshot");
        let g = graph(HAO);

        write(&g, &path).unwrap();
        let back = read(&path).unwrap();

        assert_eq!(g.iter().collect::<Vec<_>>(), back.iter().collect::<Vec<_>>());
        for node in &g {
            assert_eq!(back.index_of(node.character()), g.index_of(node.character()));
        }
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.snapshot");
        std::fs::write(&path, b"garbage").unwrap();

        write(&graph(HAO), &path).unwrap();

        assert_eq!(read(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("nope")).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(read(&path), Err(SnapshotError::Truncated(0))));
    }

    #[test]
    fn test_corrupt_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.snapshot");

        let mut buf = vec![];
        write_header(&mut buf).unwrap();
        buf.extend_from_slice(br#"[{"character": "x""#);
        std::fs::write(&path, &buf).unwrap();

        assert!(matches!(read(&path), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_dangling_index_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.snapshot");

        let mut buf = vec![];
        write_header(&mut buf).unwrap();
        buf.extend_from_slice(
            br#"[{"character": "x", "parent": null, "descendants_left": [4],
                  "descendants_right": [], "stroke_count": 1}]"#,
        );
        std::fs::write(&path, &buf).unwrap();

        assert!(matches!(read(&path), Err(SnapshotError::Json(_))));
    }
}
