//! External configuration values consumed by optional registrations.
//!
//! The pack never parses configuration files itself. Registration helpers
//! such as [`crate::RuntimePack::add_data_from_source`] ask a
//! [`ConfigSource`] for a JSON value and skip the registration when the
//! source has nothing usable.

use rustc_hash::FxHashMap;
use serde_json::Value;

// =============================================================================
// ConfigSource Trait
// =============================================================================

/// Provides JSON values keyed by module id and a sub path within it.
///
/// # Example
///
/// ```
/// use runtime_pack::{ConfigSource, MapConfigSource};
/// use serde_json::json;
///
/// let mut source = MapConfigSource::new();
/// source.insert("demo", "structures/village", json!({ "spacing": 34 }));
///
/// assert!(source.element("demo", "structures/village").is_some());
/// assert!(source.element("demo", "structures/missing").is_none());
/// ```
pub trait ConfigSource: Send + Sync {
    /// Look up the value registered for `module_id` at `sub_path`.
    ///
    /// Return `None` when nothing is configured. Callers treat `None` and a
    /// value of the wrong shape the same way.
    fn element(&self, module_id: &str, sub_path: &str) -> Option<Value>;
}

// =============================================================================
// NoConfigSource - Default Implementation
// =============================================================================

/// A source with no values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfigSource;

impl ConfigSource for NoConfigSource {
    fn element(&self, _module_id: &str, _sub_path: &str) -> Option<Value> {
        None
    }
}

// =============================================================================
// MapConfigSource - Simple Map-based Implementation
// =============================================================================

/// A map-backed configuration source.
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    values: FxHashMap<(String, String), Value>,
}

impl MapConfigSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value for `module_id` at `sub_path`.
    pub fn insert(
        &mut self,
        module_id: impl Into<String>,
        sub_path: impl Into<String>,
        value: Value,
    ) {
        self.values.insert((module_id.into(), sub_path.into()), value);
    }

    /// Remove a registered value.
    pub fn remove(&mut self, module_id: &str, sub_path: &str) -> Option<Value> {
        self.values
            .remove(&(module_id.to_owned(), sub_path.to_owned()))
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MapConfigSource {
    fn element(&self, module_id: &str, sub_path: &str) -> Option<Value> {
        self.values
            .get(&(module_id.to_owned(), sub_path.to_owned()))
            .cloned()
    }
}

impl<F> ConfigSource for F
where
    F: Fn(&str, &str) -> Option<Value> + Send + Sync,
{
    fn element(&self, module_id: &str, sub_path: &str) -> Option<Value> {
        self(module_id, sub_path)
    }
}
