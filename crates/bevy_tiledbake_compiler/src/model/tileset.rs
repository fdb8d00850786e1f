use std::ops::Range;

use crate::model::{MapObject, Property};

/// Flip and rotation flags Tiled stores in the high bits of a global id.
pub const FLIP_FLAGS: u32 = 0xF000_0000;

/// Mask extracting the tile part of a global id.
pub const GID_MASK: u32 = !FLIP_FLAGS;

/// An image reference.
///
/// `source` is normalized against the directory of the file that declared it.
/// After assembly it holds whatever reference the host resolved it to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub source: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Drawing offset applied to every tile of a tileset, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

/// A tileset, either embedded in a map or loaded from a `.tsx` file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tileset {
    pub name: String,
    /// Path of the `.tsx` file this tileset was loaded from, if external.
    pub source: Option<String>,
    /// First global id within the owning map. Zero for a standalone tileset.
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub columns: u32,
    pub tile_count: u32,
    /// Atlas image. `None` for image-collection tilesets.
    pub image: Option<Image>,
    pub tiles: Vec<TilesetTile>,
    /// Editor terrain brushes. Not written to baked output.
    pub terrain_types: Vec<TerrainType>,
    pub tile_offset: TileOffset,
    pub properties: Vec<Property>,
}

impl Tileset {
    /// The global ids owned by this tileset within its map.
    #[inline]
    pub fn gid_range(&self) -> Range<u32> {
        self.first_gid..self.first_gid.saturating_add(self.tile_count)
    }
}

/// Per-tile data of a tileset. Tiles without any data are not listed.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesetTile {
    /// Local id, unique within the tileset.
    pub id: u32,
    pub tile_type: String,
    /// Terrain corners as authored (e.g. `"0,0,,1"`). Editor only.
    pub terrain: Option<String>,
    /// Random-fill weight used by the editor. Editor only.
    pub probability: f32,
    pub image: Option<Image>,
    /// Collision and anchor shapes.
    pub objects: Vec<MapObject>,
    pub animation: Vec<Frame>,
    pub properties: Vec<Property>,
}

impl TilesetTile {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            tile_type: String::new(),
            terrain: None,
            probability: 1.0,
            image: None,
            objects: Vec::new(),
            animation: Vec::new(),
            properties: Vec::new(),
        }
    }
}

/// One frame of a tile animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Local tile id within the same tileset.
    pub tile_id: u32,
    /// Duration in milliseconds.
    pub duration: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainType {
    pub name: String,
    /// Local id of the tile representing the terrain, `-1` if none.
    pub tile: i32,
    pub properties: Vec<Property>,
}
