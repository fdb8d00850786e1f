//! Plain data read back from a baked stream.
//!
//! These mirror the baked records one to one. Unlike the authoring model
//! nothing here is optional: templates are already applied and tile data is
//! already sequenced.

use crate::model::{
    Color, Frame, GID_MASK, ObjectShape, Orientation, PlacedTile, Point, Property, RenderOrder,
    TileOffset,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeMap {
    pub background_color: Color,
    pub render_order: RenderOrder,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub orientation: Orientation,
    pub properties: Vec<Property>,
    pub tilesets: Vec<RuntimeTileset>,
    pub layers: Vec<RuntimeLayer>,
}

impl RuntimeMap {
    /// The tileset owning `gid`, with flip flags ignored.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&RuntimeTileset> {
        let gid = gid & GID_MASK;
        self.tilesets.iter().find(|tileset| {
            gid >= tileset.first_gid && gid - tileset.first_gid < tileset.tile_count
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeTileset {
    /// Image reference without extension, empty for image collections.
    pub image: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub tiles: Vec<RuntimeTile>,
    pub properties: Vec<Property>,
    pub tile_offset: TileOffset,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeTile {
    pub id: u32,
    pub tile_type: String,
    pub objects: Vec<RuntimeObject>,
    pub animation: Vec<Frame>,
    pub properties: Vec<Property>,
    /// Image reference without extension, empty when the tile has none.
    pub image: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeLayer {
    pub name: String,
    pub visible: bool,
    pub opacity: f32,
    pub kind: RuntimeLayerKind,
    pub offset: Point,
    pub properties: Vec<Property>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeLayerKind {
    Tiles {
        /// Non-empty cells in paint order.
        tiles: Vec<PlacedTile>,
        width: u32,
        height: u32,
    },
    Image {
        /// Image reference without extension.
        image: String,
        position: Point,
    },
    Objects(Vec<RuntimeObject>),
    Group(Vec<RuntimeLayer>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeObject {
    pub id: u32,
    pub name: String,
    pub object_type: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub visible: bool,
    pub shape: ObjectShape,
    pub properties: Vec<Property>,
}
