//! Resource addressing: namespaced locations and root paths.

use std::fmt;
use std::str::FromStr;

// =============================================================================
// ResourceLocation - Namespaced Identifier
// =============================================================================

/// Identifies a data resource by namespace and path.
///
/// Displayed and parsed as `namespace:path`. A string without a `:` parses
/// into the [`DEFAULT_NAMESPACE`].
///
/// # Example
///
/// ```
/// use runtime_pack::ResourceLocation;
///
/// let id: ResourceLocation = "demo:worldgen/biome/plains2.json".parse().unwrap();
/// assert_eq!(id.namespace(), "demo");
/// assert_eq!(id.path(), "worldgen/biome/plains2.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

/// Namespace assumed when a parsed location has none.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Why a namespace or path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The namespace is empty or contains a forbidden character.
    Namespace,
    /// The path is empty or contains a forbidden character.
    Path,
}

impl LocationError {
    pub(crate) fn reason(self) -> &'static str {
        match self {
            Self::Namespace => "namespace must be non-empty and match [a-z0-9_.-]",
            Self::Path => "path must be non-empty and match [a-z0-9_./-]",
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for LocationError {}

impl ResourceLocation {
    /// Create a location without validating its characters.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Create a location, rejecting characters the host would refuse.
    pub fn try_new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, LocationError> {
        let location = Self::new(namespace, path);
        location.validate()?;
        Ok(location)
    }

    /// Get the namespace (e.g., `"demo"` for `demo:loot_tables/chest.json`).
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the path within the namespace.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Derive a sibling location under `prefix/` with the given extension.
    ///
    /// `demo:plains2` with prefix `worldgen/biome` and extension `json`
    /// becomes `demo:worldgen/biome/plains2.json`.
    pub fn with_prefix_and_extension(&self, prefix: &str, extension: &str) -> Self {
        Self {
            namespace: self.namespace.clone(),
            path: format!("{prefix}/{}.{extension}", self.path),
        }
    }

    /// Check the namespace and path against the allowed character sets.
    pub fn validate(&self) -> Result<(), LocationError> {
        if self.namespace.is_empty() || !self.namespace.bytes().all(is_namespace_byte) {
            return Err(LocationError::Namespace);
        }
        if self.path.is_empty() || !self.path.bytes().all(is_path_byte) {
            return Err(LocationError::Path);
        }
        Ok(())
    }
}

fn is_namespace_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-')
}

fn is_path_byte(b: u8) -> bool {
    is_namespace_byte(b) || b == b'/'
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceLocation {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::try_new(namespace, path),
            None => Self::try_new(DEFAULT_NAMESPACE, s),
        }
    }
}

// =============================================================================
// RootPath - Flat Segment Sequence
// =============================================================================

/// Key for resources stored at the pack root, outside any namespace.
///
/// Equality is by segment sequence: `pack.mcmeta` and `["pack.mcmeta"]`
/// address the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootPath {
    segments: Vec<String>,
}

impl RootPath {
    /// Build from a `/`-separated path such as `"pack.png"`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('/').map(str::to_owned).collect(),
        }
    }

    /// Build from already-split segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.as_ref().to_owned()).collect(),
        }
    }

    /// The individual path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for RootPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for RootPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
