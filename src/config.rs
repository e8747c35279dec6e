//! Construction-time configuration for a [`RuntimePack`](crate::RuntimePack).
//!
//! Use [`PackConfigBuilder`] to describe the pack once at startup, then hand
//! the result to [`RuntimePack::new`](crate::RuntimePack::new).

use std::path::PathBuf;

/// Pack format used when none is configured.
pub const DEFAULT_PACK_FORMAT: u32 = 10;

/// Feature flag enabled by the host when nothing else is declared.
pub const VANILLA_FEATURE: &str = "minecraft:vanilla";

/// Immutable pack-level settings.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Display name; also used as the pack id and metadata description.
    pub name: String,
    /// Pack format reported in synthesized `pack` metadata.
    pub version: u32,
    /// Image registered as the root resource `pack.png`, if readable.
    pub icon: Option<PathBuf>,
    /// Feature flags reported in synthesized `features` metadata.
    pub default_features: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            name: concat!("runtime-pack/", env!("CARGO_PKG_VERSION")).to_string(),
            version: DEFAULT_PACK_FORMAT,
            icon: None,
            default_features: vec![VANILLA_FEATURE.to_string()],
        }
    }
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct PackConfigBuilder {
    name: Option<String>,
    version: Option<u32>,
    icon: Option<PathBuf>,
    default_features: Option<Vec<String>>,
}

impl PackConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    ///
    /// # Example
    ///
    /// ```
    /// use runtime_pack::config::PackConfigBuilder;
    ///
    /// let config = PackConfigBuilder::new()
    ///     .name("Runtime Pack")
    ///     .version(10)
    ///     .build();
    /// assert_eq!(config.name, "Runtime Pack");
    /// ```
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the pack format.
    ///
    /// Default: [`DEFAULT_PACK_FORMAT`]
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the icon image path.
    pub fn icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.icon = Some(path.into());
        self
    }

    /// Replace the default feature flags.
    ///
    /// Default: `["minecraft:vanilla"]`
    pub fn default_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration, filling unset fields with defaults.
    pub fn build(self) -> PackConfig {
        let defaults = PackConfig::default();
        PackConfig {
            name: self.name.unwrap_or(defaults.name),
            version: self.version.unwrap_or(defaults.version),
            icon: self.icon.or(defaults.icon),
            default_features: self.default_features.unwrap_or(defaults.default_features),
        }
    }
}
