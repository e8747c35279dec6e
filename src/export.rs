//! Writing pack resources out as editable configuration files.
//!
//! Export runs once during startup to seed a configuration directory with
//! the documents the pack was populated with. Every failure propagates: a
//! missing or corrupt output file is worse than an aborted startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PackError, PackResult};
use crate::json;
use crate::pack::{PackResources, PackType};
use crate::resource::ResourceLocation;

/// Write the data resource `from` of `pack` to `config_dir/<filename>.json`,
/// pretty-printed.
///
/// Returns the path written.
///
/// # Errors
///
/// - [`PackError::MissingUpstreamResource`] if `pack` has no such resource
/// - [`PackError::NotAnObject`] / [`PackError::Json`] if it is not a JSON object
/// - [`PackError::Io`] if the resource cannot be read
/// - [`PackError::File`] if writing the file fails
///
/// # Example
///
/// ```ignore
/// let id = ResourceLocation::new("demo", "worldgen/structure_set/village.json");
/// let path = write_resource_to_config("village", &id, &pack, Path::new("config/demo"))?;
/// ```
pub fn write_resource_to_config<P>(
    filename: &str,
    from: &ResourceLocation,
    pack: &P,
    config_dir: &Path,
) -> PackResult<PathBuf>
where
    P: PackResources + ?Sized,
{
    let Some(provider) = pack.resource(PackType::ServerData, from) else {
        tracing::error!(location = %from, pack = pack.pack_id(), "export source is missing");
        return Err(PackError::MissingUpstreamResource {
            location: from.clone(),
        });
    };

    let bytes = provider.open()?;
    let object = json::parse_object(&bytes)?.ok_or_else(|| PackError::NotAnObject {
        location: from.clone(),
    })?;

    let path = config_dir.join(format!("{filename}.json"));
    fs::write(&path, json::pretty(&Value::Object(object)))
        .map_err(|e| PackError::file(&path, e))?;

    tracing::debug!(location = %from, path = %path.display(), "exported resource");
    Ok(path)
}
