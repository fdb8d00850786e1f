//! # `bevy_tiledbake_assets`
//!
//! Bevy asset loading for baked Tiled maps.
//!
//! Two ways in:
//!
//! - **Bake on load**: `.tmx` and `.tsx` files are compiled when they are
//!   loaded. Every tileset, template and image the compiler touched becomes a
//!   dependency of the asset, so editing any of them reloads the map when
//!   Bevy's `file_watcher` feature is on.
//! - **Pre-baked**: `.tmb` (map) and `.tsb` (tileset) files written ahead of
//!   time with `bevy_tiledbake_compiler` are only read back.
//!
//! Both produce the same assets, [`BakedMapAsset`](assets::map::BakedMapAsset)
//! and [`BakedTilesetAsset`](assets::tileset::BakedTilesetAsset).
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tiledbake_assets::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledbakeAssetsPlugin::default())
//!         .add_systems(Startup, load_map)
//!         .run();
//! }
//!
//! fn load_map(asset_server: Res<AssetServer>) {
//!     let _map: Handle<BakedMapAsset> = asset_server.load("maps/level1.tmx");
//! }
//! ```

pub mod assets;
pub mod loaders;
pub mod plugin;

pub use plugin::TiledbakeAssetsPlugin;

pub mod prelude {
    pub use crate::assets::map::BakedMapAsset;
    pub use crate::assets::tileset::BakedTilesetAsset;
    pub use crate::loaders::{BakeLoaderError, BakedLoaderSettings};
    pub use crate::plugin::TiledbakeAssetsPlugin;
    pub use bevy_tiledbake_compiler::CompileSettings;
}
