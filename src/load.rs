//! Bulk ingestion from a directory tree or a zip archive.
//!
//! Both sources follow the same layout convention:
//!
//! ```text
//! data/<namespace>/<path...>  ─► data resource  <namespace>:<path...>
//! assets/...                  ─► skipped (client content)
//! anything else               ─► root resource  [segments...]
//! ```
//!
//! Entries are staged while the source is read and published in a single
//! exclusive step at the end. If reading fails part-way, nothing from that
//! call becomes visible.

use std::fs;
use std::io;
#[cfg(feature = "archive")]
use std::io::Read;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{PackError, PackResult};
use crate::pack::RuntimePack;
use crate::resource::{ByteProvider, ResourceLocation, RootPath};

// =============================================================================
// Routing
// =============================================================================

/// Where an ingested entry belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Data(ResourceLocation),
    Root(RootPath),
}

/// Map the segments of an entry path to its destination.
///
/// Returns `Ok(None)` for client assets. A data entry that sits directly
/// under `data/` has no namespace and fails the load.
fn route(segments: &[&str]) -> PackResult<Option<Route>> {
    match segments {
        [] | ["assets", ..] => Ok(None),
        ["data", namespace, path @ ..] if !path.is_empty() => Ok(Some(Route::Data(
            ResourceLocation::new(*namespace, path.join("/")),
        ))),
        ["data", ..] => Err(PackError::InvalidDataEntry {
            entry: segments.join("/"),
        }),
        _ => Ok(Some(Route::Root(RootPath::from_segments(segments)))),
    }
}

/// Entries read from a source but not yet published.
#[derive(Default)]
struct Staged {
    data: Vec<(ResourceLocation, ByteProvider)>,
    root: Vec<(RootPath, ByteProvider)>,
}

impl Staged {
    fn push(&mut self, route: Route, provider: ByteProvider) {
        match route {
            Route::Data(location) => self.data.push((location, provider)),
            Route::Root(path) => self.root.push((path, provider)),
        }
    }

    fn len(&self) -> usize {
        self.data.len() + self.root.len()
    }
}

// =============================================================================
// Directory Ingestion
// =============================================================================

/// How directory content is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// Read every file now.
    Eager,
    /// Remember paths and read on demand.
    Deferred,
}

impl RuntimePack {
    /// Read every regular file under `root_dir` into the pack.
    ///
    /// Returns the number of resources registered. Any read error aborts the
    /// whole call.
    pub fn load_from_directory(&self, root_dir: impl AsRef<Path>) -> PackResult<usize> {
        self.load_directory(root_dir.as_ref(), Capture::Eager)
    }

    /// Register every regular file under `root_dir` without reading it.
    ///
    /// Each resource reads its file when opened, so later edits on disk are
    /// visible and a deleted file surfaces as an I/O error at open time.
    pub fn load_from_directory_deferred(&self, root_dir: impl AsRef<Path>) -> PackResult<usize> {
        self.load_directory(root_dir.as_ref(), Capture::Deferred)
    }

    fn load_directory(&self, root_dir: &Path, capture: Capture) -> PackResult<usize> {
        let mut staged = Staged::default();

        for entry in WalkDir::new(root_dir).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root_dir).to_path_buf();
                PackError::file(path, io::Error::from(err))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(segments) = relative_segments(entry.path(), root_dir) else {
                tracing::warn!(path = %entry.path().display(), "non UTF-8 path in pack, ignoring");
                continue;
            };
            let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
            let Some(destination) = route(&segments)? else {
                continue;
            };

            let provider = match capture {
                Capture::Eager => {
                    let bytes =
                        fs::read(entry.path()).map_err(|e| PackError::file(entry.path(), e))?;
                    ByteProvider::memory(bytes)
                }
                Capture::Deferred => ByteProvider::disk(entry.path()),
            };
            staged.push(destination, provider);
        }

        let count = staged.len();
        self.commit(staged.data, staged.root);
        tracing::debug!(root = %root_dir.display(), count, ?capture, "loaded pack directory");
        Ok(count)
    }
}

/// Split `path` relative to `root` into UTF-8 segments.
fn relative_segments(path: &Path, root: &Path) -> Option<Vec<String>> {
    path.strip_prefix(root)
        .ok()?
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str().map(str::to_owned)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Archive Ingestion
// =============================================================================

#[cfg(feature = "archive")]
impl RuntimePack {
    /// Read a zip archive from `stream` into the pack.
    ///
    /// Entries are read sequentially, so the stream need not be seekable.
    /// Each entry must yield exactly the size recorded in its header;
    /// a short entry fails the whole call with
    /// [`PackError::MalformedArchive`].
    pub fn load_from_archive<R: Read>(&self, stream: R) -> PackResult<usize> {
        let mut stream = StopOnError::new(stream);
        let mut staged = Staged::default();

        loop {
            let step = match zip::read::read_zipfile_from_stream(&mut stream) {
                Ok(Some(mut entry)) => stage_entry(&mut entry, &mut staged).map(|()| true),
                Ok(None) => Ok(false),
                Err(err) => Err(PackError::from(err)),
            };
            // The entry has been dropped and drained; a stream failure
            // takes precedence over whatever the zip reader made of it.
            if let Some(err) = stream.take_error() {
                return Err(PackError::Io(err));
            }
            if !step? {
                break;
            }
        }

        let count = staged.len();
        self.commit(staged.data, staged.root);
        tracing::debug!(count, "loaded pack archive");
        Ok(count)
    }

    /// Open the zip file at `path` and load it with [`Self::load_from_archive`].
    pub fn load_from_archive_file(&self, path: impl AsRef<Path>) -> PackResult<usize> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| PackError::file(path, e))?;
        self.load_from_archive(io::BufReader::new(file))
    }
}

/// Route one archive entry and stage its content.
#[cfg(feature = "archive")]
fn stage_entry(entry: &mut zip::read::ZipFile<'_>, staged: &mut Staged) -> PackResult<()> {
    if entry.is_dir() {
        return Ok(());
    }
    let name = entry.name().to_owned();
    let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    let Some(destination) = route(&segments)? else {
        return Ok(());
    };

    let declared = entry.size();
    let bytes = read_declared(entry, &name, declared)?;
    staged.push(destination, ByteProvider::memory(bytes));
    Ok(())
}

/// Reader that stops at the first stream error and remembers it.
///
/// After a failure every read reports end of stream, so the zip reader can
/// drain an abandoned entry without seeing the error again.
#[cfg(feature = "archive")]
struct StopOnError<R> {
    inner: R,
    error: Option<io::Error>,
}

#[cfg(feature = "archive")]
impl<R: Read> StopOnError<R> {
    fn new(inner: R) -> Self {
        Self { inner, error: None }
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

#[cfg(feature = "archive")]
impl<R: Read> Read for StopOnError<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.error.is_some() {
            return Ok(0);
        }
        loop {
            match self.inner.read(buf) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::trace!(%err, "archive stream failed");
                    self.error = Some(err);
                    return Ok(0);
                }
                ok => return ok,
            }
        }
    }
}

/// Upper bound on the buffer reserved up front from an untrusted header.
#[cfg(feature = "archive")]
const MAX_PREALLOC: u64 = 1 << 20;

/// Read exactly `declared` bytes of an archive entry.
#[cfg(feature = "archive")]
fn read_declared(entry: &mut impl Read, name: &str, declared: u64) -> PackResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(declared.min(MAX_PREALLOC) as usize);
    let result = entry.by_ref().take(declared).read_to_end(&mut buf);
    let actual = buf.len() as u64;

    let malformed = |reason: String| PackError::MalformedArchive {
        entry: name.to_owned(),
        declared,
        actual,
        reason,
    };

    match result {
        Ok(_) if actual == declared => Ok(buf),
        Ok(_) => Err(malformed("stream ended early".into())),
        // The zip reader reports a short entry as a checksum or EOF failure.
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData | io::ErrorKind::Other
            ) =>
        {
            Err(malformed(err.to_string()))
        }
        Err(err) => Err(PackError::Io(err)),
    }
}
