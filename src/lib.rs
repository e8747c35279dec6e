//! # runtime-pack
//!
//! An in-memory data pack that a program fills while it runs and a host
//! content loader reads from.
//!
//! The pack keeps two stores:
//!
//! - **Data resources**, addressed by [`ResourceLocation`]
//!   (`namespace:path`), e.g. `demo:worldgen/biome/plains2.json`
//! - **Root resources**, addressed by [`RootPath`] segments,
//!   e.g. `pack.mcmeta` or `pack.png`
//!
//! Content arrives three ways:
//!
//! - **Registration**: JSON documents under category prefixes, canonically
//!   encoded ([`RuntimePack::add_biome`], [`RuntimePack::add_loot_table`], ...)
//! - **Directory ingestion**: [`RuntimePack::load_from_directory`]
//! - **Archive ingestion**: [`RuntimePack::load_from_archive`] (`archive` feature)
//!
//! The host reads through the [`PackResources`] trait. Pack metadata falls
//! back to synthesized `pack` and `features` sections when no `pack.mcmeta`
//! is registered.
//!
//! ## Quick Start
//!
//! ```
//! use runtime_pack::prelude::*;
//! use serde_json::json;
//!
//! let pack = RuntimePack::new(
//!     PackConfigBuilder::new().name("Runtime Pack").version(10).build(),
//! );
//!
//! pack.add_biome(&ResourceLocation::new("demo", "plains2"), &json!({ "temperature": 0.8 }));
//!
//! let id = ResourceLocation::new("demo", "worldgen/biome/plains2.json");
//! let bytes = pack.resource(PackType::ServerData, &id).unwrap().open().unwrap();
//! assert_eq!(&bytes[..], br#"{"temperature":0.8}"#);
//!
//! let meta = pack.metadata_section(&PackSection::CODEC).unwrap();
//! assert_eq!(meta.pack_format, 10);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Construction-time settings
//! - [`resource`]: Locations, providers, stores and the access gate
//! - [`pack`]: The [`RuntimePack`] and its host contract
//! - [`load`]: Directory and archive ingestion
//! - [`json`]: Canonical JSON encoding
//! - [`source`]: External configuration values
//! - [`export`]: Writing resources out as configuration files

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod export;
pub mod json;
pub mod load;
pub mod pack;
pub mod resource;
pub mod source;

// =============================================================================
// Prelude - import commonly used items with a single `use`
// =============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use runtime_pack::prelude::*;
/// ```
pub mod prelude {
    // Pack
    pub use crate::{
        FeatureFlagsSection, JsonSection, MetadataSectionCodec, PackResources, PackSection,
        PackType, RuntimePack,
    };

    // Addressing
    pub use crate::{ByteProvider, ResourceLocation, RootPath};

    // Configuration
    pub use crate::{ConfigSource, MapConfigSource, PackConfig, PackConfigBuilder};

    // Errors
    pub use crate::{PackError, PackResult};
}

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{PackConfig, PackConfigBuilder};
pub use error::{PackError, PackResult};
pub use export::write_resource_to_config;
pub use pack::{
    FeatureFlagsSection, JsonSection, MetadataError, MetadataSectionCodec, PACK_ICON, PACK_META,
    PackResources, PackSection, PackType, RuntimePack,
};
pub use resource::{AccessGate, ByteProvider, KeyedStore, ResourceLocation, RootPath};
pub use source::{ConfigSource, MapConfigSource, NoConfigSource};

/// Shared byte buffer type returned by providers.
pub use bytes::Bytes;
