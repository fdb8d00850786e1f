//! The baked runtime format.
//!
//! A baked stream is written in a single forward pass with no offsets or
//! seeks, so readers must consume it in the same order. All integers are
//! little-endian; strings are a `u32` byte length followed by UTF-8.
//!
//! A map stream is laid out as:
//!
//! ```text
//! header      rgb background, render order, width, height,
//!             tile width, tile height, orientation, properties
//! tilesets    count, tileset records
//! layers      count, layer records (group layers nest a layer table)
//! ```
//!
//! A standalone tileset stream is a single tileset record.

mod reader;
mod runtime;
mod serialize;
mod writer;

pub use reader::{ReadError, read_map, read_tileset};
pub use runtime::{
    RuntimeLayer, RuntimeLayerKind, RuntimeMap, RuntimeObject, RuntimeTile, RuntimeTileset,
};
pub use serialize::{SerializeError, image_reference, write_map, write_tileset};
pub use writer::BinaryWriter;

use crate::model::{Orientation, RenderOrder};

/// Layer record discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum LayerTag {
    Tiles = 0,
    Image = 1,
    Objects = 2,
    Group = 3,
}

impl LayerTag {
    pub(crate) fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LayerTag::Tiles),
            1 => Some(LayerTag::Image),
            2 => Some(LayerTag::Objects),
            3 => Some(LayerTag::Group),
            _ => None,
        }
    }
}

/// Object record shape discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ShapeTag {
    Rectangle = 0,
    Ellipse = 1,
    Polygon = 2,
    Polyline = 3,
    Tile = 4,
}

impl ShapeTag {
    pub(crate) fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ShapeTag::Rectangle),
            1 => Some(ShapeTag::Ellipse),
            2 => Some(ShapeTag::Polygon),
            3 => Some(ShapeTag::Polyline),
            4 => Some(ShapeTag::Tile),
            _ => None,
        }
    }
}

/// One-byte encoding of a model enum.
pub(crate) trait WireTag: Sized {
    /// Name used in read errors.
    const KIND: &'static str;

    fn to_tag(self) -> u8;
    fn from_tag(tag: u8) -> Option<Self>;
}

impl WireTag for RenderOrder {
    const KIND: &'static str = "render order";

    fn to_tag(self) -> u8 {
        match self {
            RenderOrder::RightDown => 0,
            RenderOrder::RightUp => 1,
            RenderOrder::LeftDown => 2,
            RenderOrder::LeftUp => 3,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        RenderOrder::ALL.into_iter().find(|order| order.to_tag() == tag)
    }
}

impl WireTag for Orientation {
    const KIND: &'static str = "orientation";

    fn to_tag(self) -> u8 {
        match self {
            Orientation::Orthogonal => 0,
            Orientation::Isometric => 1,
            Orientation::Staggered => 2,
            Orientation::Hexagonal => 3,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Orientation::Orthogonal),
            1 => Some(Orientation::Isometric),
            2 => Some(Orientation::Staggered),
            3 => Some(Orientation::Hexagonal),
            _ => None,
        }
    }
}
