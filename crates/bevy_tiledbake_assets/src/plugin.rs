use std::path::PathBuf;

use bevy::prelude::*;

use crate::assets::{map::BakedMapAsset, tileset::BakedTilesetAsset};
use crate::loaders::{
    baked::{BakedMapLoader, BakedTilesetLoader},
    map::TmxBakeLoader,
    tileset::TsxBakeLoader,
};

/// Plugin that registers the baked asset types and their loaders
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tiledbake_assets::TiledbakeAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TiledbakeAssetsPlugin::default())
///     .run();
/// ```
///
/// # What this plugin does
///
/// - Registers 2 asset types: `BakedMapAsset`, `BakedTilesetAsset`
/// - Registers bake-on-load loaders for `.tmx` and `.tsx` files
/// - Registers loaders for pre-baked `.tmb` and `.tsb` files
///
/// The bake-on-load loaders read referenced files straight from `asset_root`,
/// which must match the directory Bevy's `AssetPlugin` serves.
#[derive(Debug, Clone)]
pub struct TiledbakeAssetsPlugin {
    pub asset_root: PathBuf,
}

impl TiledbakeAssetsPlugin {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }
}

impl Default for TiledbakeAssetsPlugin {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl Plugin for TiledbakeAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<BakedMapAsset>().init_asset::<BakedTilesetAsset>();

        app.register_asset_loader(TmxBakeLoader {
            root: self.asset_root.clone(),
        })
        .register_asset_loader(TsxBakeLoader {
            root: self.asset_root.clone(),
        })
        .register_asset_loader(BakedMapLoader)
        .register_asset_loader(BakedTilesetLoader);
    }
}
