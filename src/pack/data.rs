//! JSON document registration under category prefixes.
//!
//! A document registered for `demo:plains2` in the `worldgen/biome` category
//! is stored at `demo:worldgen/biome/plains2.json`, canonically encoded.

use bytes::Bytes;
use serde_json::Value;

use super::RuntimePack;
use crate::json;
use crate::resource::ResourceLocation;
use crate::source::ConfigSource;

/// Category prefix for structure sets.
pub const STRUCTURE_SET: &str = "worldgen/structure_set";
/// Category prefix for biomes.
pub const BIOME: &str = "worldgen/biome";
/// Category prefix for structures.
pub const STRUCTURE: &str = "worldgen/structure";
/// Category prefix for loot tables.
pub const LOOT_TABLE: &str = "loot_tables";

impl RuntimePack {
    /// Register a structure set document.
    pub fn add_structure_set(&self, identifier: &ResourceLocation, set: &Value) -> Bytes {
        self.add_data_for_json_location(STRUCTURE_SET, identifier, set)
    }

    /// Register a biome document.
    pub fn add_biome(&self, identifier: &ResourceLocation, biome: &Value) -> Bytes {
        self.add_data_for_json_location(BIOME, identifier, biome)
    }

    /// Register a structure document.
    pub fn add_structure(&self, identifier: &ResourceLocation, structure: &Value) -> Bytes {
        self.add_data_for_json_location(STRUCTURE, identifier, structure)
    }

    /// Register a loot table document.
    pub fn add_loot_table(&self, identifier: &ResourceLocation, table: &Value) -> Bytes {
        self.add_data_for_json_location(LOOT_TABLE, identifier, table)
    }

    /// Register a document at `category/<path>.json` in the identifier's
    /// namespace. Returns the canonical bytes that were stored.
    ///
    /// # Example
    ///
    /// ```
    /// use runtime_pack::{ResourceLocation, RuntimePack};
    /// use serde_json::json;
    ///
    /// let pack = RuntimePack::default();
    /// let id = ResourceLocation::new("demo", "plains2");
    /// pack.add_data_for_json_location("worldgen/biome", &id, &json!({ "temperature": 0.8 }));
    ///
    /// assert!(pack.has_resource(&ResourceLocation::new("demo", "worldgen/biome/plains2.json")));
    /// ```
    pub fn add_data_for_json_location(
        &self,
        category: &str,
        identifier: &ResourceLocation,
        document: &Value,
    ) -> Bytes {
        self.add_serialized_data(category, "json", identifier, document)
    }

    /// Register a canonically encoded document at
    /// `category/<path>.<extension>`.
    pub fn add_serialized_data(
        &self,
        category: &str,
        extension: &str,
        identifier: &ResourceLocation,
        document: &Value,
    ) -> Bytes {
        let location = identifier.with_prefix_and_extension(category, extension);
        self.add_data(location, json::canonicalize(document))
    }

    /// Register a document taken from an external configuration source.
    ///
    /// Returns `None`, and leaves the pack untouched, when the source has no
    /// value for `(source_module_id, source_sub_path)` or the value is not a
    /// JSON object. Optional configuration is not an error.
    pub fn add_data_from_source(
        &self,
        source: &dyn ConfigSource,
        category: &str,
        identifier: &ResourceLocation,
        source_sub_path: &str,
        source_module_id: &str,
    ) -> Option<Bytes> {
        match source.element(source_module_id, source_sub_path) {
            Some(document @ Value::Object(_)) => {
                Some(self.add_data_for_json_location(category, identifier, &document))
            }
            Some(_) => {
                tracing::debug!(
                    module = source_module_id,
                    path = source_sub_path,
                    "configured value is not a JSON object, skipping registration"
                );
                None
            }
            None => {
                tracing::debug!(
                    module = source_module_id,
                    path = source_sub_path,
                    "no configured value, skipping registration"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MapConfigSource, NoConfigSource};
    use serde_json::json;

    fn stored(pack: &RuntimePack, namespace: &str, path: &str) -> Option<Bytes> {
        pack.data_resource(&ResourceLocation::new(namespace, path))
            .map(|p| p.open().unwrap())
    }

    #[test]
    fn test_biome_location() {
        let pack = RuntimePack::default();
        let doc = json!({ "has_precipitation": true, "temperature": 0.8 });
        let bytes = pack.add_biome(&ResourceLocation::new("demo", "plains2"), &doc);

        assert_eq!(stored(&pack, "demo", "worldgen/biome/plains2.json"), Some(bytes.clone()));
        assert_eq!(json::parse(&bytes).unwrap(), doc);
    }

    #[test]
    fn test_category_wrappers() {
        let pack = RuntimePack::default();
        let id = ResourceLocation::new("demo", "x");
        let doc = json!({});

        pack.add_structure_set(&id, &doc);
        pack.add_structure(&id, &doc);
        pack.add_loot_table(&id, &doc);

        assert!(stored(&pack, "demo", "worldgen/structure_set/x.json").is_some());
        assert!(stored(&pack, "demo", "worldgen/structure/x.json").is_some());
        assert!(stored(&pack, "demo", "loot_tables/x.json").is_some());
        assert_eq!(pack.data_len(), 3);
    }

    #[test]
    fn test_registered_bytes_are_canonical() {
        let pack = RuntimePack::default();
        let doc = json!({ "b": 1, "a": [true, null] });
        let bytes = pack.add_loot_table(&ResourceLocation::new("demo", "t"), &doc);
        assert_eq!(&bytes[..], br#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn test_custom_extension() {
        let pack = RuntimePack::default();
        pack.add_serialized_data("tags/blocks", "mcmeta", &ResourceLocation::new("demo", "x"), &json!({}));
        assert!(stored(&pack, "demo", "tags/blocks/x.mcmeta").is_some());
    }

    #[test]
    fn test_from_source_registers_objects() {
        let mut source = MapConfigSource::new();
        source.insert("demo", "sets/village", json!({ "spacing": 34 }));
        let pack = RuntimePack::default();

        let bytes = pack.add_data_from_source(
            &source,
            STRUCTURE_SET,
            &ResourceLocation::new("demo", "village"),
            "sets/village",
            "demo",
        );

        assert_eq!(&bytes.unwrap()[..], br#"{"spacing":34}"#);
        assert!(stored(&pack, "demo", "worldgen/structure_set/village.json").is_some());
    }

    #[test]
    fn test_from_source_tolerates_missing_and_non_objects() {
        let mut source = MapConfigSource::new();
        source.insert("demo", "sets/list", json!([1, 2, 3]));
        let pack = RuntimePack::default();
        let id = ResourceLocation::new("demo", "village");

        assert!(pack.add_data_from_source(&source, BIOME, &id, "sets/list", "demo").is_none());
        assert!(pack.add_data_from_source(&NoConfigSource, BIOME, &id, "sets/village", "demo").is_none());
        assert_eq!(pack.data_len(), 0);
    }
}
