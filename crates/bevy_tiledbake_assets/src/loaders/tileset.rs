use std::path::{Path, PathBuf};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
    tasks::ConditionalSendFuture,
};
use bevy_tiledbake_compiler::{CompileError, CompileSettings, Compiler, FsHost, read_tileset};

use crate::assets::tileset::{BakedTilesetAsset, tile_image_references};
use crate::loaders::{BakeLoaderError, asset_path_string, register_dependencies};

/// Asset loader that bakes standalone Tiled tilesets (.tsx files)
///
/// Objects on tiles are resolved against their templates. Tile templates
/// that carry a global id need a map to place it in and fail to bake here.
#[derive(Clone)]
pub struct TsxBakeLoader {
    pub root: PathBuf,
}

impl Default for TsxBakeLoader {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

impl AssetLoader for TsxBakeLoader {
    type Asset = BakedTilesetAsset;
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
            let (baked, dependencies) = bake_tileset(&source, &path, &self.root, settings)?;
            let tileset = read_tileset(&baked)?;
            debug!("Baked tileset {path}: {} bytes", baked.len());

            let mut images = register_dependencies(load_context, dependencies).await?;
            let atlas_image = images.remove(&tileset.image);
            let tile_images = tile_image_references(&tileset)
                .filter_map(|(id, image)| Some((id, images.get(image)?.clone())))
                .collect();
            Ok(BakedTilesetAsset::new(tileset, atlas_image, tile_images))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}

/// Compile a standalone tileset against the asset directory at `root`.
pub fn bake_tileset(
    source: &str,
    path: &str,
    root: &Path,
    settings: &CompileSettings,
) -> Result<(Vec<u8>, Vec<String>), CompileError> {
    let mut host = FsHost::new(root);
    let baked =
        Compiler::with_settings(&mut host, settings.clone()).compile_tileset(source, path)?;
    Ok((baked, host.take_dependencies()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::tests::temp_assets;

    const PROPS: &str = r#"<tileset name="props" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="../images/props.png" width="32" height="32"/>
 <tile id="1" type="chest">
  <objectgroup><object id="1" template="../templates/hitbox.tx"/></objectgroup>
 </tile>
</tileset>"#;

    const HITBOX: &str = r#"<template>
 <object name="Hitbox" width="12" height="10"/>
</template>"#;

    #[test]
    fn test_bake_tileset_resolves_tile_templates() {
        let root = temp_assets("bake_tileset");
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(root.join("templates/hitbox.tx"), HITBOX).unwrap();
        std::fs::write(root.join("images/props.png"), b"png").unwrap();

        let (baked, dependencies) = bake_tileset(
            PROPS,
            "tilesets/props.tsx",
            &root,
            &CompileSettings::default(),
        )
        .unwrap();
        let tileset = read_tileset(&baked).unwrap();

        assert_eq!(tileset.image, "images/props");
        assert!(dependencies.contains(&String::from("templates/hitbox.tx")));
        assert!(dependencies.contains(&String::from("images/props.png")));
        let chest = &tileset.tiles[0];
        assert_eq!(chest.tile_type, "chest");
        assert_eq!(chest.objects[0].name, "Hitbox");
        assert_eq!(chest.objects[0].width, 12.0);

        std::fs::remove_dir_all(root).unwrap();
    }

    const PROPS_COLLECTION: &str = r#"<tileset name="props" tilewidth="32" tileheight="32" tilecount="2" columns="0">
 <tile id="0"><image source="../images/barrel.png" width="32" height="32"/></tile>
 <tile id="1"><image source="../images/crate.png" width="32" height="32"/></tile>
</tileset>"#;

    #[test]
    fn test_bake_image_collection_keeps_tile_images() {
        let root = temp_assets("bake_image_collection");
        std::fs::write(root.join("images/barrel.png"), b"png").unwrap();
        std::fs::write(root.join("images/crate.png"), b"png").unwrap();

        let (baked, dependencies) = bake_tileset(
            PROPS_COLLECTION,
            "tilesets/props.tsx",
            &root,
            &CompileSettings::default(),
        )
        .unwrap();
        let tileset = read_tileset(&baked).unwrap();

        assert!(tileset.image.is_empty());
        let references: Vec<_> = tile_image_references(&tileset).collect();
        assert_eq!(references, [(0, "images/barrel"), (1, "images/crate")]);
        assert!(dependencies.contains(&String::from("images/crate.png")));

        std::fs::remove_dir_all(root).unwrap();
    }
}
