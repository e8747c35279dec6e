//! Error types for pack ingestion and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::resource::ResourceLocation;

/// Result alias used throughout the crate.
pub type PackResult<T> = Result<T, PackError>;

/// Error type for the fail-fast paths of the pack.
///
/// Lookups never produce this type: a missing resource is `None`. Only
/// ingestion ([`crate::load`]) and strict export ([`crate::export`]) fail.
///
/// # Example
///
/// ```ignore
/// match pack.load_from_archive(stream) {
///     Ok(count) => tracing::debug!(count, "archive loaded"),
///     Err(PackError::MalformedArchive { entry, .. }) => {
///         eprintln!("archive was cut off at {entry}");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum PackError {
    /// An archive entry did not yield the number of bytes it declared.
    #[error("archive entry `{entry}` declared {declared} bytes but only {actual} were readable ({reason})")]
    MalformedArchive {
        /// Entry name inside the archive.
        entry: String,
        /// Size recorded in the entry header.
        declared: u64,
        /// Bytes actually read before the stream ended or failed.
        actual: u64,
        /// What stopped the read.
        reason: String,
    },

    /// An ingested entry sits directly under `data/` with no namespace
    /// directory.
    #[error("data entry `{entry}` is not inside a namespace directory")]
    InvalidDataEntry {
        /// Entry path relative to the pack root.
        entry: String,
    },

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    File {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Stream I/O error without an associated path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The resource a strict operation depends on is not in the pack.
    #[error("resource {location} is not present in the pack")]
    MissingUpstreamResource {
        /// The requested location.
        location: ResourceLocation,
    },

    /// A resource parsed as JSON but its top level is not an object.
    #[error("resource {location} is not a JSON object")]
    NotAnObject {
        /// The offending location.
        location: ResourceLocation,
    },

    /// JSON parse or encode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The archive container itself is unreadable.
    #[error("archive error: {0}")]
    Archive(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

#[cfg(feature = "archive")]
impl From<zip::result::ZipError> for PackError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(Box::new(err))
    }
}

impl PackError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Check whether this error came from a truncated or corrupt archive.
    pub fn is_malformed_archive(&self) -> bool {
        match self {
            Self::MalformedArchive { .. } | Self::Archive(_) => true,
            _ => false,
        }
    }
}
