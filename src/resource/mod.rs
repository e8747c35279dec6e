//! Storage primitives behind the pack.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RuntimePack                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  AccessGate (shared for reads, exclusive for writes)     │
//! │        │                                                 │
//! │        ├─► KeyedStore<ResourceLocation>  data resources  │
//! │        │       demo:worldgen/biome/x.json ─► provider    │
//! │        │                                                 │
//! │        └─► KeyedStore<RootPath>          root resources  │
//! │                pack.mcmeta / pack.png    ─► provider     │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod gate;
mod location;
mod provider;
mod store;

pub use gate::{AccessGate, ReadPass, WritePass};
pub use location::{DEFAULT_NAMESPACE, LocationError, ResourceLocation, RootPath};
pub use provider::ByteProvider;
pub use store::KeyedStore;
