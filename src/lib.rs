//! # bevy_tiledbake
//!
//! Bake Tiled maps into a compact binary format and load them in Bevy.
//!
//! This is a meta-crate combining the `bevy_tiledbake_*` sub-crates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tiledbake::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyTiledbakePlugin::default())
//!         .add_systems(Startup, load_map)
//!         .run();
//! }
//!
//! fn load_map(asset_server: Res<AssetServer>) {
//!     // Compiled on load; `maps/level1.tmb` would load a pre-baked copy
//!     let _map: Handle<BakedMapAsset> = asset_server.load("maps/level1.tmx");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`compiler`]: the Bevy-free compiler. Parses `.tmx`/`.tsx`/`.tx`,
//!   resolves templates, decodes and orders tile data, writes the baked
//!   stream and reads it back.
//! - [`assets`]: asset types, loaders and [`TiledbakeAssetsPlugin`](assets::TiledbakeAssetsPlugin).
//!
//! To bake ahead of time instead of on load, use the compiler directly:
//!
//! ```rust,no_run
//! use bevy_tiledbake::compiler::prelude::*;
//!
//! let mut host = FsHost::new("assets");
//! let source = std::fs::read_to_string("assets/maps/level1.tmx")?;
//! let baked = Compiler::new(&mut host).compile_map(&source, "maps/level1.tmx")?;
//! std::fs::write("assets/maps/level1.tmb", baked)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_tiledbake_assets as assets;
pub use bevy_tiledbake_compiler as compiler;

/// Unified prelude for bevy_tiledbake
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::compiler::protocol::{
        RuntimeLayer, RuntimeLayerKind, RuntimeMap, RuntimeObject, RuntimeTile, RuntimeTileset,
    };

    pub use crate::plugin::BevyTiledbakePlugin;
}
