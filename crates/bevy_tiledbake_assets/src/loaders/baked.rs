//! Loaders for streams baked ahead of time (`.tmb` maps, `.tsb` tilesets).

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    platform::collections::HashMap,
    prelude::*,
    tasks::ConditionalSendFuture,
};
use bevy_tiledbake_compiler::{read_map, read_tileset};

use crate::assets::map::{BakedMapAsset, image_references};
use crate::assets::tileset::{BakedTilesetAsset, tile_image_references};
use crate::loaders::{BakeLoaderError, BakedLoaderSettings};

#[derive(Default)]
pub struct BakedMapLoader;

impl AssetLoader for BakedMapLoader {
    type Asset = BakedMapAsset;
    type Settings = BakedLoaderSettings;
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
            let map = read_map(&bytes)?;

            let mut images = HashMap::default();
            for reference in image_references(&map) {
                let handle: Handle<Image> = load_context.load(settings.image_path(reference));
                images.insert(reference.to_string(), handle);
            }

            Ok(BakedMapAsset::new(map, images))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmb"]
    }
}

#[derive(Default)]
pub struct BakedTilesetLoader;

impl AssetLoader for BakedTilesetLoader {
    type Asset = BakedTilesetAsset;
    type Settings = BakedLoaderSettings;
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
            let tileset = read_tileset(&bytes)?;

            let atlas_image = (!tileset.image.is_empty())
                .then(|| load_context.load::<Image>(settings.image_path(&tileset.image)));
            let tile_images = tile_image_references(&tileset)
                .map(|(id, image)| (id, load_context.load(settings.image_path(image))))
                .collect();

            Ok(BakedTilesetAsset::new(tileset, atlas_image, tile_images))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tsb"]
    }
}
