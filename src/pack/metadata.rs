//! Pack metadata sections.
//!
//! # Resolution Order
//!
//! ```text
//! metadata_json("pack")
//!   │
//!   ├─► root resource `pack.mcmeta` present
//!   │     └─► parse object ─► object["pack"]        (absent if key missing)
//!   │
//!   └─► otherwise synthesize
//!         ├─ "pack"     ─► {"pack_format": version, "description": name}
//!         ├─ "features" ─► {"enabled": default_features}
//!         └─ other      ─► absent
//! ```
//!
//! A pack with no registered metadata therefore still answers the two
//! sections every host requires.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use super::{PACK_META, RuntimePack};
use crate::json;
use crate::resource::RootPath;

// =============================================================================
// Codec Capability
// =============================================================================

/// Error raised by a codec while decoding a section.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The section JSON does not have the expected shape.
    #[error("invalid `{section}` section: {source}")]
    Shape {
        /// Section name.
        section: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The codec rejected the section for its own reasons.
    #[error("invalid `{section}` section: {message}")]
    Rejected {
        /// Section name.
        section: String,
        /// Explanation from the codec.
        message: String,
    },
}

/// Decodes one named metadata section.
///
/// Hosts supply their own codecs; the pack only locates the section JSON.
pub trait MetadataSectionCodec {
    /// Decoded section type.
    type Section;

    /// Key of the section inside `pack.mcmeta` (e.g. `"pack"`).
    fn section_name(&self) -> &str;

    /// Decode the section object.
    fn from_json(&self, value: Value) -> Result<Self::Section, MetadataError>;
}

/// Decode a section with serde.
fn decode<T: DeserializeOwned>(section: &str, value: Value) -> Result<T, MetadataError> {
    serde_json::from_value(value).map_err(|source| MetadataError::Shape {
        section: section.to_owned(),
        source,
    })
}

/// Codec returning the raw JSON of any named section.
#[derive(Debug, Clone)]
pub struct JsonSection(pub String);

impl JsonSection {
    /// Create a pass-through codec for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl MetadataSectionCodec for JsonSection {
    type Section = Value;

    fn section_name(&self) -> &str {
        &self.0
    }

    fn from_json(&self, value: Value) -> Result<Value, MetadataError> {
        Ok(value)
    }
}

/// The `pack` section: format number and description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackSection {
    /// Pack format number.
    pub pack_format: u32,
    /// Description text component (a string or a JSON text object).
    pub description: Value,
}

impl PackSection {
    /// Name of this section in `pack.mcmeta`.
    pub const NAME: &'static str = "pack";
    /// Codec for this section.
    pub const CODEC: TypedSection<PackSection> = TypedSection::new(Self::NAME);
}

/// The `features` section: enabled feature flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureFlagsSection {
    /// Enabled feature flag identifiers.
    pub enabled: Vec<String>,
}

impl FeatureFlagsSection {
    /// Name of this section in `pack.mcmeta`.
    pub const NAME: &'static str = "features";
    /// Codec for this section.
    pub const CODEC: TypedSection<FeatureFlagsSection> = TypedSection::new(Self::NAME);
}

/// Codec decoding a section into `T` with serde.
#[derive(Debug)]
pub struct TypedSection<T> {
    name: &'static str,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> TypedSection<T> {
    /// Create a codec for the section called `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: DeserializeOwned> MetadataSectionCodec for TypedSection<T> {
    type Section = T;

    fn section_name(&self) -> &str {
        self.name
    }

    fn from_json(&self, value: Value) -> Result<T, MetadataError> {
        decode(self.name, value)
    }
}

// =============================================================================
// Resolution
// =============================================================================

impl RuntimePack {
    /// Locate the JSON of the named metadata section.
    pub fn metadata_json(&self, section: &str) -> Option<Value> {
        if let Some(provider) = self.root_resource_at(&RootPath::parse(PACK_META)) {
            return match provider.open() {
                Ok(bytes) => explicit_section(&bytes, section),
                Err(err) => {
                    tracing::error!(section, %err, "couldn't read {PACK_META}");
                    None
                }
            };
        }

        match section {
            PackSection::NAME => Some(json!({
                "pack_format": self.version,
                "description": self.name,
            })),
            FeatureFlagsSection::NAME => Some(json!({
                "enabled": self.default_features,
            })),
            _ => {
                tracing::debug!(section, "unsupported metadata section");
                None
            }
        }
    }
}

/// Pull `section` out of an explicit `pack.mcmeta` document.
fn explicit_section(bytes: &[u8], section: &str) -> Option<Value> {
    let mut document = match json::parse_object(bytes) {
        Ok(Some(document)) => document,
        Ok(None) => {
            tracing::error!(section, "couldn't load metadata: {PACK_META} is not an object");
            return None;
        }
        Err(err) => {
            tracing::error!(section, %err, "couldn't load metadata from {PACK_META}");
            return None;
        }
    };

    match document.remove(section) {
        Some(value @ Value::Object(_)) => Some(value),
        Some(_) => {
            tracing::error!(section, "couldn't load metadata: section is not an object");
            None
        }
        None => None,
    }
}

/// Decode a located section, logging codec failures.
pub(crate) fn decode_section<C: MetadataSectionCodec>(
    codec: &C,
    value: Option<Value>,
) -> Option<C::Section> {
    match codec.from_json(value?) {
        Ok(section) => Some(section),
        Err(err) => {
            tracing::error!(section = codec.section_name(), %err, "couldn't decode metadata");
            None
        }
    }
}
