//! Unified plugin for bevy_tiledbake.

use std::path::PathBuf;

use bevy::prelude::*;

use bevy_tiledbake_assets::TiledbakeAssetsPlugin;

/// Unified plugin that adds all bevy_tiledbake functionality.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tiledbake::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins.set(AssetPlugin {
///         file_path: "content".into(),
///         ..default()
///     }))
///     .add_plugins(BevyTiledbakePlugin::default().with_asset_root("content"))
///     .run();
/// ```
#[derive(Debug, Clone)]
pub struct BevyTiledbakePlugin {
    /// Directory the bake-on-load loaders read referenced files from
    pub asset_root: PathBuf,
}

impl BevyTiledbakePlugin {
    /// Set the asset root; keep it in step with `AssetPlugin::file_path`
    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }
}

impl Default for BevyTiledbakePlugin {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl Plugin for BevyTiledbakePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TiledbakeAssetsPlugin::new(self.asset_root.clone()));

        info!("BevyTiledbakePlugin initialized");
    }
}
