//! The resource-pack contract seen by the host.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde_json::Value;

use super::RuntimePack;
use super::metadata::{MetadataSectionCodec, decode_section};
use crate::resource::{ByteProvider, ResourceLocation, RootPath};

/// Which side of the host is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackType {
    /// Client-side assets.
    ClientResources,
    /// Server-side data.
    ServerData,
}

impl PackType {
    /// Top-level directory holding this type's content in a pack.
    pub fn directory(self) -> &'static str {
        match self {
            Self::ClientResources => "assets",
            Self::ServerData => "data",
        }
    }
}

/// Read access a host needs from a pack.
///
/// Missing content is always `None`, never an error.
pub trait PackResources: Send + Sync {
    /// Look up a resource at the pack root by its path segments.
    fn root_resource(&self, segments: &[&str]) -> Option<ByteProvider>;

    /// Look up a namespaced resource.
    fn resource(&self, pack_type: PackType, location: &ResourceLocation) -> Option<ByteProvider>;

    /// Deliver every resource in `namespace` whose path contains `prefix/`.
    fn list_resources(
        &self,
        pack_type: PackType,
        namespace: &str,
        prefix: &str,
        sink: &mut dyn FnMut(ResourceLocation, ByteProvider),
    );

    /// Namespaces with at least one resource.
    fn namespaces(&self, pack_type: PackType) -> FxHashSet<String>;

    /// JSON of the named metadata section, if the pack has or synthesizes one.
    fn metadata_json(&self, section: &str) -> Option<Value>;

    /// Decode a metadata section through a host codec.
    ///
    /// Decoding failures are logged and reported as `None`.
    fn metadata_section<C: MetadataSectionCodec>(&self, codec: &C) -> Option<C::Section>
    where
        Self: Sized,
    {
        decode_section(codec, self.metadata_json(codec.section_name()))
    }

    /// Stable identifier of the pack.
    fn pack_id(&self) -> &str;

    /// Whether the pack is built into the program rather than loaded from disk.
    fn is_builtin(&self) -> bool;

    /// Called when the host is done with the pack.
    fn close(&self) {}
}

/// The runtime pack serves the same data store to both pack types; it
/// never holds client assets.
impl PackResources for RuntimePack {
    fn root_resource(&self, segments: &[&str]) -> Option<ByteProvider> {
        self.root_resource_at(&RootPath::from_segments(segments))
    }

    fn resource(&self, _pack_type: PackType, location: &ResourceLocation) -> Option<ByteProvider> {
        self.data_resource(location)
    }

    fn list_resources(
        &self,
        _pack_type: PackType,
        namespace: &str,
        prefix: &str,
        sink: &mut dyn FnMut(ResourceLocation, ByteProvider),
    ) {
        self.list(namespace, prefix, sink);
    }

    fn namespaces(&self, _pack_type: PackType) -> FxHashSet<String> {
        RuntimePack::namespaces(self)
    }

    fn metadata_json(&self, section: &str) -> Option<Value> {
        RuntimePack::metadata_json(self, section)
    }

    fn pack_id(&self) -> &str {
        self.name()
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn close(&self) {
        tracing::debug!(name = %self.name(), "closing runtime pack");
    }
}

impl<P: PackResources + ?Sized> PackResources for Arc<P> {
    fn root_resource(&self, segments: &[&str]) -> Option<ByteProvider> {
        (**self).root_resource(segments)
    }

    fn resource(&self, pack_type: PackType, location: &ResourceLocation) -> Option<ByteProvider> {
        (**self).resource(pack_type, location)
    }

    fn list_resources(
        &self,
        pack_type: PackType,
        namespace: &str,
        prefix: &str,
        sink: &mut dyn FnMut(ResourceLocation, ByteProvider),
    ) {
        (**self).list_resources(pack_type, namespace, prefix, sink);
    }

    fn namespaces(&self, pack_type: PackType) -> FxHashSet<String> {
        (**self).namespaces(pack_type)
    }

    fn metadata_json(&self, section: &str) -> Option<Value> {
        (**self).metadata_json(section)
    }

    fn pack_id(&self) -> &str {
        (**self).pack_id()
    }

    fn is_builtin(&self) -> bool {
        (**self).is_builtin()
    }

    fn close(&self) {
        (**self).close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackConfigBuilder;
    use crate::pack::{JsonSection, PACK_META};
    use bytes::Bytes;
    use serde_json::json;

    fn pack() -> Arc<RuntimePack> {
        Arc::new(RuntimePack::new(PackConfigBuilder::new().name("Runtime Pack").build()))
    }

    #[test]
    fn test_contract_flags() {
        let pack = pack();
        assert!(pack.is_builtin());
        assert_eq!(pack.pack_id(), "Runtime Pack");
        pack.close();
    }

    #[test]
    fn test_resource_ignores_pack_type() {
        let pack = pack();
        let id = ResourceLocation::new("demo", "a.json");
        pack.add_data(id.clone(), b"x".to_vec());

        let server = pack.resource(PackType::ServerData, &id).unwrap();
        let client = pack.resource(PackType::ClientResources, &id).unwrap();
        assert_eq!(server.open().unwrap(), client.open().unwrap());
    }

    #[test]
    fn test_root_resource_by_segments() {
        let pack = pack();
        pack.add_root_resource("a/b.txt", b"b".to_vec());
        let provider = pack.root_resource(&["a", "b.txt"]).unwrap();
        assert_eq!(provider.open().unwrap(), Bytes::from_static(b"b"));
        assert!(pack.root_resource(&["a"]).is_none());
    }

    #[test]
    fn test_list_through_dyn_contract() {
        let pack = pack();
        pack.add_data(ResourceLocation::new("demo", "loot_tables/a.json"), b"a".to_vec());
        pack.add_data(ResourceLocation::new("demo", "loot_tables/b.json"), b"b".to_vec());

        let host: &dyn PackResources = &pack;
        let mut seen = Vec::new();
        host.list_resources(PackType::ServerData, "demo", "loot_tables", &mut |id, _| {
            seen.push(id);
        });
        seen.sort();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path(), "loot_tables/a.json");
        assert_eq!(host.namespaces(PackType::ServerData).len(), 1);
    }

    #[test]
    fn test_metadata_through_arc() {
        let pack = pack();
        let section = pack.metadata_section(&JsonSection::new("pack")).unwrap();
        assert_eq!(section["description"], json!("Runtime Pack"));

        pack.add_root_resource(PACK_META, br#"{"pack":{"pack_format":1,"description":"d"}}"#.to_vec());
        assert_eq!(pack.metadata_json("pack").unwrap()["pack_format"], json!(1));
    }

    #[test]
    fn test_pack_type_directory() {
        assert_eq!(PackType::ServerData.directory(), "data");
        assert_eq!(PackType::ClientResources.directory(), "assets");
    }
}
