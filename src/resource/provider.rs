//! Deferred byte producers handed out by lookups.

use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

/// Produces the content of a resource on demand.
///
/// A provider can be opened any number of times, and stays valid after its
/// entry has been removed from the store it came from.
///
/// - [`ByteProvider::Memory`] holds a shared, already-read buffer. Opening it
///   is a reference-count bump and cannot fail.
/// - [`ByteProvider::Disk`] remembers a file path and reads the file every
///   time it is opened.
#[derive(Clone)]
pub enum ByteProvider {
    /// Materialized content.
    Memory(Bytes),
    /// Content read from this file when opened.
    Disk(Arc<Path>),
}

impl ByteProvider {
    /// Wrap an in-memory buffer.
    pub fn memory(bytes: impl Into<Bytes>) -> Self {
        Self::Memory(bytes.into())
    }

    /// Defer reading to `path`.
    pub fn disk(path: impl Into<PathBuf>) -> Self {
        Self::Disk(Arc::from(path.into()))
    }

    /// Produce the full content.
    pub fn open(&self) -> io::Result<Bytes> {
        match self {
            Self::Memory(bytes) => Ok(bytes.clone()),
            Self::Disk(path) => fs::read(path).map(Bytes::from),
        }
    }

    /// Produce the content as a readable stream.
    pub fn reader(&self) -> io::Result<Cursor<Bytes>> {
        self.open().map(Cursor::new)
    }

    /// Check whether opening this provider touches the filesystem.
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Disk(_))
    }
}

impl fmt::Debug for ByteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => f.debug_tuple("Memory").field(&bytes.len()).finish(),
            Self::Disk(path) => f.debug_tuple("Disk").field(path).finish(),
        }
    }
}

impl From<Bytes> for ByteProvider {
    fn from(bytes: Bytes) -> Self {
        Self::Memory(bytes)
    }
}

impl From<Vec<u8>> for ByteProvider {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_memory_open_is_repeatable() {
        let provider = ByteProvider::memory(b"hello".to_vec());
        assert_eq!(provider.open().unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(provider.open().unwrap(), Bytes::from_static(b"hello"));
        assert!(!provider.is_deferred());
    }

    #[test]
    fn test_reader_yields_content() {
        let provider = ByteProvider::memory(Bytes::from_static(b"{}"));
        let mut text = String::new();
        provider.reader().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_disk_reads_on_every_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.json");
        fs::write(&path, "first").unwrap();

        let provider = ByteProvider::disk(&path);
        assert!(provider.is_deferred());
        assert_eq!(provider.open().unwrap(), Bytes::from_static(b"first"));

        fs::write(&path, "second").unwrap();
        assert_eq!(provider.open().unwrap(), Bytes::from_static(b"second"));
    }

    #[test]
    fn test_disk_missing_file_errors() {
        let provider = ByteProvider::disk("/nonexistent/file.json");
        assert!(provider.open().is_err());
    }
}
