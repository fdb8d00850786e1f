use std::path::{Path, PathBuf};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
    tasks::ConditionalSendFuture,
};
use bevy_tiledbake_compiler::{CompileError, CompileSettings, Compiler, FsHost, read_map};

use crate::assets::map::BakedMapAsset;
use crate::loaders::{BakeLoaderError, asset_path_string, register_dependencies};

/// Asset loader that bakes Tiled maps (.tmx files) as they are loaded
///
/// Referenced tilesets, templates and images are read from `root` on disk
/// and registered as dependencies of the map.
#[derive(Clone)]
pub struct TmxBakeLoader {
    pub root: PathBuf,
}

impl Default for TmxBakeLoader {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

impl AssetLoader for TmxBakeLoader {
    type Asset = BakedMapAsset;
    type Settings = CompileSettings;
    type Error = BakeLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let source = String::from_utf8(bytes)?;

            let path = asset_path_string(load_context);
            let (baked, dependencies) = bake_map(&source, &path, &self.root, settings)?;
            let map = read_map(&baked)?;
            debug!(
                "Baked map {path}: {} bytes, {} dependencies",
                baked.len(),
                dependencies.len()
            );

            let images = register_dependencies(load_context, dependencies).await?;
            Ok(BakedMapAsset::new(map, images))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmx"]
    }
}

/// Compile a map against the asset directory at `root`.
///
/// # Returns
/// * `Ok((Vec<u8>, Vec<String>))` - The baked stream and every asset-relative
///   path the compiler read
/// * `Err(CompileError)` - If the map or anything it references fails to compile
pub fn bake_map(
    source: &str,
    path: &str,
    root: &Path,
    settings: &CompileSettings,
) -> Result<(Vec<u8>, Vec<String>), CompileError> {
    let mut host = FsHost::new(root);
    let baked = Compiler::with_settings(&mut host, settings.clone()).compile_map(source, path)?;
    Ok((baked, host.take_dependencies()))
}
