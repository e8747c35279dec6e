//! The runtime pack: an in-memory data pack populated while the process runs.
//!
//! A [`RuntimePack`] is built once at startup from a [`PackConfig`] and then
//! shared (usually behind an `Arc`) between the code that registers content
//! and the host that reads it.
//!
//! ```text
//! writers ──► add_* / remove_* / load_* ──► AccessGate::write ──► stores
//! host    ──► PackResources              ──► AccessGate::read  ──► stores
//! ```
//!
//! Registration is split across submodules:
//!
//! - [`data`]: JSON documents under category prefixes (biomes, loot tables, ...)
//! - [`host`]: the [`PackResources`] contract the host reads through
//! - [`metadata`]: `pack.mcmeta` sections with synthesized defaults

pub mod data;
pub mod host;
pub mod metadata;

use std::fs;
use std::path::Path;

use bytes::Bytes;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::config::PackConfig;
use crate::json;
use crate::resource::{AccessGate, ByteProvider, KeyedStore, ResourceLocation, RootPath};

pub use host::{PackResources, PackType};
pub use metadata::{
    FeatureFlagsSection, JsonSection, MetadataError, MetadataSectionCodec, PackSection,
    TypedSection,
};

/// Root resource holding the pack icon.
pub const PACK_ICON: &str = "pack.png";

/// Root resource holding explicit pack metadata.
pub const PACK_META: &str = "pack.mcmeta";

/// An in-memory pack of data and root resources.
///
/// All methods take `&self`; the pack is safe to share between threads.
#[derive(Debug)]
pub struct RuntimePack {
    name: String,
    version: u32,
    default_features: Vec<String>,
    gate: AccessGate,
    data: KeyedStore<ResourceLocation>,
    root: KeyedStore<RootPath>,
}

impl RuntimePack {
    /// Create a pack from its configuration.
    ///
    /// An unreadable icon is logged and skipped; it never fails construction.
    pub fn new(config: PackConfig) -> Self {
        let pack = Self {
            name: config.name,
            version: config.version,
            default_features: config.default_features,
            gate: AccessGate::new(),
            data: KeyedStore::new(),
            root: KeyedStore::new(),
        };

        if let Some(icon) = config.icon.as_deref().and_then(read_icon) {
            pack.add_root_resource(PACK_ICON, icon);
        }

        tracing::debug!(name = %pack.name, version = pack.version, "created runtime pack");
        pack
    }

    /// Display name of the pack.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pack format reported in synthesized metadata.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Feature flags reported in synthesized metadata.
    pub fn default_features(&self) -> &[String] {
        &self.default_features
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Store `bytes` as the data resource `location`, replacing any previous
    /// content. Returns the stored bytes.
    pub fn add_data(&self, location: ResourceLocation, bytes: impl Into<Bytes>) -> Bytes {
        let _pass = self.gate.write();
        tracing::trace!(%location, "registering data resource");
        self.data.put(location, bytes)
    }

    /// Register a provider (for example a deferred disk read) as a data resource.
    pub fn add_data_provider(&self, location: ResourceLocation, provider: ByteProvider) {
        let _pass = self.gate.write();
        self.data.put_provider(location, provider);
    }

    /// Store `bytes` as a root resource at the `/`-separated `path`.
    pub fn add_root_resource(&self, path: &str, bytes: impl Into<Bytes>) -> Bytes {
        let _pass = self.gate.write();
        self.root.put(RootPath::parse(path), bytes)
    }

    /// Remove a data resource. Removing an absent location is a no-op.
    pub fn remove_data(&self, location: &ResourceLocation) -> bool {
        let _pass = self.gate.write();
        self.data.remove(location)
    }

    /// Remove a root resource. Removing an absent path is a no-op.
    pub fn remove_root_resource(&self, path: &str) -> bool {
        let _pass = self.gate.write();
        self.root.remove(&RootPath::parse(path))
    }

    /// Publish a batch of staged entries in one exclusive step.
    pub(crate) fn commit(
        &self,
        data: Vec<(ResourceLocation, ByteProvider)>,
        root: Vec<(RootPath, ByteProvider)>,
    ) {
        let _pass = self.gate.write();
        self.data.extend(data);
        self.root.extend(root);
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Check whether a data resource is registered.
    pub fn has_resource(&self, location: &ResourceLocation) -> bool {
        let _pass = self.gate.read();
        self.data.contains(location)
    }

    /// Look up a data resource.
    pub fn data_resource(&self, location: &ResourceLocation) -> Option<ByteProvider> {
        let _pass = self.gate.read();
        self.data.get(location)
    }

    /// Look up a root resource.
    pub fn root_resource_at(&self, path: &RootPath) -> Option<ByteProvider> {
        let _pass = self.gate.read();
        self.root.get(path)
    }

    /// Namespaces that have at least one data resource.
    pub fn namespaces(&self) -> FxHashSet<String> {
        let _pass = self.gate.read();
        self.data
            .keys()
            .into_iter()
            .map(|location| location.namespace().to_owned())
            .collect()
    }

    /// Feed every data resource in `namespace` whose path contains
    /// `prefix/` to `sink`.
    ///
    /// Matches are collected under shared access and delivered after it is
    /// released, so the sink may register or remove resources itself.
    pub fn list(
        &self,
        namespace: &str,
        prefix: &str,
        mut sink: impl FnMut(ResourceLocation, ByteProvider),
    ) {
        let needle = format!("{prefix}/");
        let matches = {
            let _pass = self.gate.read();
            self.data.entries_where(|location| {
                location.namespace() == namespace && location.path().contains(&needle)
            })
        };
        for (location, provider) in matches {
            sink(location, provider);
        }
    }

    /// Parse a data resource as a JSON object.
    ///
    /// Missing resources, unreadable content and non-object documents are
    /// logged and reported as `None`.
    pub fn json_resource(&self, location: &ResourceLocation) -> Option<Map<String, Value>> {
        let Some(provider) = self.data_resource(location) else {
            tracing::error!(%location, "couldn't get JSON object: resource is missing");
            return None;
        };
        let bytes = match provider.open() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(%location, %err, "couldn't get JSON object: read failed");
                return None;
            }
        };
        match json::parse_object(&bytes) {
            Ok(Some(object)) => Some(object),
            Ok(None) => {
                tracing::error!(%location, "couldn't get JSON object: not an object");
                None
            }
            Err(err) => {
                tracing::error!(%location, %err, "couldn't get JSON object: parse failed");
                None
            }
        }
    }

    /// Number of data resources.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Number of root resources.
    pub fn root_len(&self) -> usize {
        self.root.len()
    }
}

impl Default for RuntimePack {
    fn default() -> Self {
        Self::new(PackConfig::default())
    }
}

/// Read the icon image, logging instead of failing.
fn read_icon(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "couldn't read pack icon");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackConfigBuilder;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn loc(namespace: &str, path: &str) -> ResourceLocation {
        ResourceLocation::new(namespace, path)
    }

    fn open(provider: Option<ByteProvider>) -> Option<Bytes> {
        provider.map(|p| p.open().unwrap())
    }

    #[test]
    fn test_icon_registered_as_root_resource() {
        let dir = TempDir::new().unwrap();
        let icon = dir.path().join("icon.png");
        fs::write(&icon, b"\x89PNG").unwrap();

        let pack = RuntimePack::new(PackConfigBuilder::new().icon(&icon).build());
        let bytes = open(pack.root_resource_at(&RootPath::parse(PACK_ICON))).unwrap();
        assert_eq!(&bytes[..], b"\x89PNG");
    }

    #[test]
    fn test_missing_icon_is_skipped() {
        let pack = RuntimePack::new(
            PackConfigBuilder::new()
                .icon("/nonexistent/icon.png")
                .build(),
        );
        assert_eq!(pack.root_len(), 0);
    }

    #[test]
    fn test_add_and_remove_data() {
        let pack = RuntimePack::default();
        let id = loc("demo", "loot_tables/chest.json");

        pack.add_data(id.clone(), b"{}".to_vec());
        assert!(pack.has_resource(&id));
        assert_eq!(open(pack.data_resource(&id)).unwrap(), Bytes::from_static(b"{}"));

        assert!(pack.remove_data(&id));
        assert!(!pack.remove_data(&id));
        assert!(pack.data_resource(&id).is_none());
    }

    #[test]
    fn test_root_resource_by_segments() {
        let pack = RuntimePack::default();
        pack.add_root_resource("extra/readme.txt", b"hi".to_vec());
        let path = RootPath::from_segments(&["extra", "readme.txt"]);
        assert_eq!(open(pack.root_resource_at(&path)).unwrap(), Bytes::from_static(b"hi"));
        assert!(pack.remove_root_resource("extra/readme.txt"));
        assert!(pack.root_resource_at(&path).is_none());
    }

    #[test]
    fn test_namespaces() {
        let pack = RuntimePack::default();
        pack.add_data(loc("a", "x.json"), b"1".to_vec());
        pack.add_data(loc("a", "y.json"), b"2".to_vec());
        pack.add_data(loc("b", "x.json"), b"3".to_vec());

        let namespaces = pack.namespaces();
        assert_eq!(namespaces.len(), 2);
        assert!(namespaces.contains("a"));
        assert!(namespaces.contains("b"));
    }

    #[test]
    fn test_list_filters_namespace_and_prefix() {
        let pack = RuntimePack::default();
        pack.add_data(loc("demo", "worldgen/biome/a.json"), b"a".to_vec());
        pack.add_data(loc("demo", "worldgen/biome/b.json"), b"b".to_vec());
        pack.add_data(loc("demo", "loot_tables/c.json"), b"c".to_vec());
        pack.add_data(loc("other", "worldgen/biome/d.json"), b"d".to_vec());
        // `biome` alone is not a path segment here
        pack.add_data(loc("demo", "worldgen/biomes.json"), b"e".to_vec());

        let mut found = Vec::new();
        pack.list("demo", "biome", |id, provider| {
            found.push((id.path().to_owned(), provider.open().unwrap()));
        });
        found.sort();

        assert_eq!(
            found,
            vec![
                ("worldgen/biome/a.json".to_owned(), Bytes::from_static(b"a")),
                ("worldgen/biome/b.json".to_owned(), Bytes::from_static(b"b")),
            ]
        );
    }

    #[test]
    fn test_list_sink_may_mutate_pack() {
        let pack = RuntimePack::default();
        pack.add_data(loc("demo", "tags/a.json"), b"a".to_vec());

        pack.list("demo", "tags", |id, _| {
            pack.remove_data(&id);
            pack.add_data(loc("demo", "copied/a.json"), b"a".to_vec());
        });

        assert!(!pack.has_resource(&loc("demo", "tags/a.json")));
        assert!(pack.has_resource(&loc("demo", "copied/a.json")));
    }

    #[test]
    fn test_has_resource_waits_for_writer() {
        use std::sync::mpsc;
        use std::time::Duration;

        let pack = Arc::new(RuntimePack::default());
        pack.add_data(loc("demo", "a.json"), b"a".to_vec());

        let pass = pack.gate.write();
        let (tx, rx) = mpsc::channel();
        let reader = {
            let pack = Arc::clone(&pack);
            thread::spawn(move || tx.send(pack.has_resource(&loc("demo", "a.json"))).unwrap())
        };

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(pass);
        assert!(rx.recv().unwrap());
        reader.join().unwrap();
    }

    #[test]
    fn test_json_resource() {
        let pack = RuntimePack::default();
        pack.add_data(loc("demo", "a.json"), br#"{"x":1}"#.to_vec());
        pack.add_data(loc("demo", "b.json"), b"[1]".to_vec());
        pack.add_data(loc("demo", "c.json"), b"{".to_vec());

        let object = pack.json_resource(&loc("demo", "a.json")).unwrap();
        assert_eq!(object["x"], 1);
        assert!(pack.json_resource(&loc("demo", "b.json")).is_none());
        assert!(pack.json_resource(&loc("demo", "c.json")).is_none());
        assert!(pack.json_resource(&loc("demo", "missing.json")).is_none());
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let pack = Arc::new(RuntimePack::default());
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let pack = Arc::clone(&pack);
                thread::spawn(move || {
                    for i in 0..200 {
                        let id = loc("demo", &format!("worldgen/biome/{t}_{i}.json"));
                        pack.add_data(id.clone(), format!("{t}:{i}").into_bytes());
                        if i % 4 == 0 {
                            pack.remove_data(&id);
                        }
                    }
                })
            })
            .collect();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let pack = Arc::clone(&pack);
                thread::spawn(move || {
                    for _ in 0..50 {
                        pack.list("demo", "biome", |id, provider| {
                            let bytes = provider.open().unwrap();
                            let expected = id
                                .path()
                                .trim_start_matches("worldgen/biome/")
                                .trim_end_matches(".json")
                                .replace('_', ":");
                            assert_eq!(bytes, Bytes::from(expected.into_bytes()));
                        });
                        let _ = RuntimePack::namespaces(&pack);
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }
        assert_eq!(pack.data_len(), 4 * 150);
    }
}
