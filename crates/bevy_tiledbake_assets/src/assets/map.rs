use bevy::{platform::collections::HashMap, prelude::*};
use bevy_tiledbake_compiler::{
    RuntimeMap, RuntimeTileset,
    model::GID_MASK,
    protocol::{RuntimeLayer, RuntimeLayerKind},
};

use super::tileset::tile_image_references;

/// A baked map (`.tmx` compiled on load, or a pre-baked `.tmb`).
#[derive(TypePath, Asset, Debug)]
pub struct BakedMapAsset {
    /// The map as read back from the baked stream.
    pub map: RuntimeMap,

    // ===== BEVY ASSET REFERENCES =====
    /// Tileset spritesheets and image layer images
    /// Key: baked image reference (asset path without extension)
    pub images: HashMap<String, Handle<Image>>,

    // ===== PROCESSED DATA FOR BEVY =====
    /// Map size in tiles
    pub tilemap_size: UVec2,

    /// Map tile size in pixels
    pub tile_size: UVec2,

    /// Largest tile size across all tilesets
    pub largest_tile_size: UVec2,
}

impl BakedMapAsset {
    pub fn new(map: RuntimeMap, images: HashMap<String, Handle<Image>>) -> Self {
        let tile_size = UVec2::new(map.tile_width, map.tile_height);
        let largest_tile_size = map
            .tilesets
            .iter()
            .map(|tileset| UVec2::new(tileset.tile_width, tileset.tile_height))
            .fold(tile_size, UVec2::max);
        Self {
            tilemap_size: UVec2::new(map.width, map.height),
            tile_size,
            largest_tile_size,
            map,
            images,
        }
    }

    /// Handle for a baked image reference.
    pub fn image(&self, reference: &str) -> Option<&Handle<Image>> {
        self.images.get(reference)
    }

    /// The tileset owning `gid` and the spritesheet it draws from.
    ///
    /// Flip flags in `gid` are ignored.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<(&RuntimeTileset, Option<&Handle<Image>>)> {
        let tileset = self.map.tileset_for_gid(gid)?;
        Some((tileset, self.image(&tileset.image)))
    }

    /// Image to draw `gid` from: its tileset's spritesheet, or the tile's own
    /// image in an image collection.
    pub fn tile_image(&self, gid: u32) -> Option<&Handle<Image>> {
        let (tileset, atlas) = self.tileset_for_gid(gid)?;
        if atlas.is_some() {
            return atlas;
        }
        let local = (gid & GID_MASK) - tileset.first_gid;
        tile_image_references(tileset)
            .find(|(id, _)| *id == local)
            .and_then(|(_, image)| self.image(image))
    }

    /// Map bounding box in pixels, for orthogonal maps.
    pub fn rect(&self) -> Rect {
        let size = (self.tilemap_size * self.tile_size).as_vec2();
        Rect::from_corners(Vec2::ZERO, size)
    }
}

/// Every image reference in a map, in first-seen order.
///
/// Tileset images come first (each spritesheet, then its per-tile images),
/// then image layers depth first through groups.
pub fn image_references(map: &RuntimeMap) -> Vec<&str> {
    let mut references = Vec::new();
    for tileset in &map.tilesets {
        push_reference(&mut references, &tileset.image);
        for (_, image) in tile_image_references(tileset) {
            push_reference(&mut references, image);
        }
    }
    collect_layer_images(&map.layers, &mut references);
    references
}

fn collect_layer_images<'a>(layers: &'a [RuntimeLayer], references: &mut Vec<&'a str>) {
    for layer in layers {
        match &layer.kind {
            RuntimeLayerKind::Image { image, .. } => push_reference(references, image),
            RuntimeLayerKind::Group(children) => collect_layer_images(children, references),
            RuntimeLayerKind::Tiles { .. } | RuntimeLayerKind::Objects(_) => {}
        }
    }
}

fn push_reference<'a>(references: &mut Vec<&'a str>, reference: &'a str) {
    if !reference.is_empty() && !references.contains(&reference) {
        references.push(reference);
    }
}

#[cfg(test)]
mod tests {
    use bevy_tiledbake_compiler::{model::Point, protocol::RuntimeTile};

    use super::*;

    fn image_layer(name: &str, image: &str) -> RuntimeLayer {
        RuntimeLayer {
            name: name.to_string(),
            visible: true,
            opacity: 1.0,
            kind: RuntimeLayerKind::Image {
                image: image.to_string(),
                position: Point::default(),
            },
            offset: Point::default(),
            properties: Vec::new(),
        }
    }

    fn sample_map() -> RuntimeMap {
        RuntimeMap {
            width: 30,
            height: 20,
            tile_width: 16,
            tile_height: 16,
            tilesets: vec![
                RuntimeTileset {
                    image: String::from("images/terrain"),
                    first_gid: 1,
                    tile_width: 16,
                    tile_height: 16,
                    tile_count: 64,
                    columns: 8,
                    ..Default::default()
                },
                RuntimeTileset {
                    first_gid: 65,
                    tile_width: 32,
                    tile_height: 48,
                    tile_count: 4,
                    tiles: vec![RuntimeTile {
                        id: 1,
                        image: String::from("images/barrel"),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            layers: vec![
                image_layer("sky", "images/sky"),
                RuntimeLayer {
                    kind: RuntimeLayerKind::Group(vec![
                        image_layer("hills", "images/hills"),
                        image_layer("sky again", "images/sky"),
                    ]),
                    ..image_layer("parallax", "")
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_image_references_in_order_without_duplicates() {
        let map = sample_map();
        assert_eq!(
            image_references(&map),
            ["images/terrain", "images/barrel", "images/sky", "images/hills"]
        );
    }

    #[test]
    fn test_processed_sizes() {
        let asset = BakedMapAsset::new(sample_map(), HashMap::default());
        assert_eq!(asset.tilemap_size, UVec2::new(30, 20));
        assert_eq!(asset.tile_size, UVec2::new(16, 16));
        assert_eq!(asset.largest_tile_size, UVec2::new(32, 48));
        assert_eq!(asset.rect().max, Vec2::new(480.0, 320.0));
    }

    #[test]
    fn test_tileset_for_gid_without_images() {
        let asset = BakedMapAsset::new(sample_map(), HashMap::default());
        let (tileset, image) = asset.tileset_for_gid(0x8000_0042).unwrap();
        assert_eq!(tileset.first_gid, 65);
        assert!(image.is_none());
        assert!(asset.tileset_for_gid(69).is_none());
    }

    #[test]
    fn test_tile_image_for_image_collection() {
        let barrel = Handle::<Image>::default();
        let mut images = HashMap::default();
        images.insert(String::from("images/barrel"), barrel.clone());
        let asset = BakedMapAsset::new(sample_map(), images);

        assert_eq!(asset.tile_image(0x4000_0042), Some(&barrel));
        assert!(asset.tile_image(65).is_none());
        assert!(asset.tile_image(1).is_none());
    }
}
