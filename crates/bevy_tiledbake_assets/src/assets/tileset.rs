use bevy::{math::URect, platform::collections::HashMap, prelude::*};
use bevy_tiledbake_compiler::{RuntimeTileset, protocol::RuntimeTile};

use super::grid_size;

/// A baked tileset (`.tsx` compiled on load, or a pre-baked `.tsb`).
#[derive(TypePath, Asset, Debug)]
pub struct BakedTilesetAsset {
    /// The tileset as read back from the baked stream.
    pub tileset: RuntimeTileset,

    /// Spritesheet image, `None` for image collection tilesets.
    pub atlas_image: Option<Handle<Image>>,

    /// Images of tiles that carry their own, keyed by local tile id.
    pub tile_images: HashMap<u32, Handle<Image>>,

    /// Tile size in pixels (width, height)
    pub tile_size: UVec2,

    /// Grid dimensions in tiles (columns, rows), `UVec2::ZERO` for image
    /// collections.
    pub grid_size: UVec2,
}

impl BakedTilesetAsset {
    pub fn new(
        tileset: RuntimeTileset,
        atlas_image: Option<Handle<Image>>,
        tile_images: HashMap<u32, Handle<Image>>,
    ) -> Self {
        Self {
            tile_size: UVec2::new(tileset.tile_width, tileset.tile_height),
            grid_size: grid_size(tileset.columns, tileset.tile_count),
            tileset,
            atlas_image,
            tile_images,
        }
    }

    /// Image to draw a tile from: the spritesheet, or the tile's own image
    /// in an image collection.
    pub fn get_tile_image(&self, local_tile_id: u32) -> Option<&Handle<Image>> {
        match &self.atlas_image {
            Some(atlas) => Some(atlas),
            None => self.tile_images.get(&local_tile_id),
        }
    }

    #[inline]
    pub fn is_image_collection(&self) -> bool {
        self.tileset.image.is_empty()
    }

    /// Per-tile data for a local tile id, if the tile has any.
    pub fn tile(&self, local_tile_id: u32) -> Option<&RuntimeTile> {
        self.tileset.tiles.iter().find(|tile| tile.id == local_tile_id)
    }

    /// Pixel rectangle of a tile inside the spritesheet.
    ///
    /// # Arguments
    /// * `local_tile_id` - The local tile ID (0-based, NOT a GID)
    ///
    /// # Returns
    /// * `Some(URect)` - The tile's area, accounting for margin and spacing
    /// * `None` - For image collections or ids past the tile count
    pub fn tile_rect(&self, local_tile_id: u32) -> Option<URect> {
        if self.grid_size.x == 0 || local_tile_id >= self.tileset.tile_count {
            return None;
        }
        let column = local_tile_id % self.grid_size.x;
        let row = local_tile_id / self.grid_size.x;
        let min = UVec2::new(
            self.tileset.margin + column * (self.tile_size.x + self.tileset.spacing),
            self.tileset.margin + row * (self.tile_size.y + self.tileset.spacing),
        );
        Some(URect::from_corners(min, min + self.tile_size))
    }
}

/// `(local id, image reference)` for every tile with its own image.
pub fn tile_image_references(tileset: &RuntimeTileset) -> impl Iterator<Item = (u32, &str)> {
    tileset
        .tiles
        .iter()
        .filter(|tile| !tile.image.is_empty())
        .map(|tile| (tile.id, tile.image.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spritesheet() -> RuntimeTileset {
        RuntimeTileset {
            image: String::from("images/terrain"),
            first_gid: 1,
            tile_width: 16,
            tile_height: 16,
            spacing: 2,
            margin: 1,
            columns: 4,
            tile_count: 10,
            tiles: vec![RuntimeTile {
                id: 5,
                tile_type: String::from("water"),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_processed_sizes() {
        let asset = BakedTilesetAsset::new(spritesheet(), None, HashMap::default());
        assert_eq!(asset.tile_size, UVec2::new(16, 16));
        assert_eq!(asset.grid_size, UVec2::new(4, 3));
        assert!(!asset.is_image_collection());
    }

    #[test]
    fn test_tile_rect_with_margin_and_spacing() {
        let asset = BakedTilesetAsset::new(spritesheet(), None, HashMap::default());
        assert_eq!(asset.tile_rect(0), Some(URect::new(1, 1, 17, 17)));
        assert_eq!(asset.tile_rect(5), Some(URect::new(19, 19, 35, 35)));
        assert_eq!(asset.tile_rect(10), None);
    }

    #[test]
    fn test_image_collection_has_no_rects() {
        let asset = BakedTilesetAsset::new(
            RuntimeTileset {
                tile_count: 3,
                ..Default::default()
            },
            None,
            HashMap::default(),
        );
        assert!(asset.is_image_collection());
        assert_eq!(asset.grid_size, UVec2::ZERO);
        assert_eq!(asset.tile_rect(0), None);
    }

    #[test]
    fn test_tile_lookup() {
        let asset = BakedTilesetAsset::new(spritesheet(), None, HashMap::default());
        assert_eq!(asset.tile(5).map(|tile| tile.tile_type.as_str()), Some("water"));
        assert!(asset.tile(4).is_none());
    }

    fn image_collection() -> RuntimeTileset {
        let tile = |id: u32, image: &str| RuntimeTile {
            id,
            image: image.to_string(),
            ..Default::default()
        };
        RuntimeTileset {
            first_gid: 1,
            tile_width: 32,
            tile_height: 32,
            tile_count: 3,
            tiles: vec![tile(0, "images/barrel"), tile(1, ""), tile(2, "images/crate")],
            ..Default::default()
        }
    }

    #[test]
    fn test_tile_image_references_skip_tiles_without_images() {
        let tileset = image_collection();
        let references: Vec<_> = tile_image_references(&tileset).collect();
        assert_eq!(references, [(0, "images/barrel"), (2, "images/crate")]);
    }

    #[test]
    fn test_get_tile_image() {
        let barrel = Handle::<Image>::default();
        let mut tile_images = HashMap::default();
        tile_images.insert(0, barrel.clone());
        let asset = BakedTilesetAsset::new(image_collection(), None, tile_images);
        assert_eq!(asset.get_tile_image(0), Some(&barrel));
        assert!(asset.get_tile_image(1).is_none());

        let atlas = Handle::<Image>::default();
        let asset = BakedTilesetAsset::new(spritesheet(), Some(atlas.clone()), HashMap::default());
        assert_eq!(asset.get_tile_image(7), Some(&atlas));
    }
}
