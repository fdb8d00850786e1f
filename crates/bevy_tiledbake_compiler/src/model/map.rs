use crate::model::{Layer, MapObject, Property, Tileset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    /// Parse the Tiled `orientation` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "orthogonal" => Some(Orientation::Orthogonal),
            "isometric" => Some(Orientation::Isometric),
            "staggered" => Some(Orientation::Staggered),
            "hexagonal" => Some(Orientation::Hexagonal),
            _ => None,
        }
    }
}

/// Horizontal traversal direction of a render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Horizontal {
    /// Ascending x.
    Right,
    /// Descending x.
    Left,
}

/// Vertical traversal direction of a render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vertical {
    /// Ascending y.
    Down,
    /// Descending y.
    Up,
}

/// Order in which the tiles of a layer are painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub const ALL: [RenderOrder; 4] = [
        RenderOrder::RightDown,
        RenderOrder::RightUp,
        RenderOrder::LeftDown,
        RenderOrder::LeftUp,
    ];

    /// Parse the Tiled `renderorder` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "right-down" => Some(RenderOrder::RightDown),
            "right-up" => Some(RenderOrder::RightUp),
            "left-down" => Some(RenderOrder::LeftDown),
            "left-up" => Some(RenderOrder::LeftUp),
            _ => None,
        }
    }

    pub fn horizontal(self) -> Horizontal {
        match self {
            RenderOrder::RightDown | RenderOrder::RightUp => Horizontal::Right,
            RenderOrder::LeftDown | RenderOrder::LeftUp => Horizontal::Left,
        }
    }

    pub fn vertical(self) -> Vertical {
        match self {
            RenderOrder::RightDown | RenderOrder::LeftDown => Vertical::Down,
            RenderOrder::RightUp | RenderOrder::LeftUp => Vertical::Up,
        }
    }
}

/// An opaque RGB color. Alpha from `#AARRGGBB` values is dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (the leading `#` is optional).
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        let rgb = match hex.len() {
            6 => hex,
            8 => hex.get(2..)?,
            _ => return None,
        };
        let channel = |index: usize| u8::from_str_radix(rgb.get(index..index + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A tileset referenced by a map.
#[derive(Clone, Debug, PartialEq)]
pub enum TilesetEntry {
    /// Tileset data available in the graph, embedded or already loaded.
    Inline(Tileset),
    /// Tileset stored in another file, not loaded yet.
    External { first_gid: u32, source: String },
}

impl TilesetEntry {
    pub fn first_gid(&self) -> u32 {
        match self {
            TilesetEntry::Inline(tileset) => tileset.first_gid,
            TilesetEntry::External { first_gid, .. } => *first_gid,
        }
    }

    /// The loaded tileset, if any.
    pub fn tileset(&self) -> Option<&Tileset> {
        match self {
            TilesetEntry::Inline(tileset) => Some(tileset),
            TilesetEntry::External { .. } => None,
        }
    }
}

/// A Tiled map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Map {
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub background_color: Option<Color>,
    pub tilesets: Vec<TilesetEntry>,
    /// Layers in draw order.
    pub layers: Vec<Layer>,
    pub properties: Vec<Property>,
}

/// The tileset a template's tile object refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateTileset {
    pub first_gid: u32,
    pub source: String,
}

/// A `.tx` object template. Only ever used as a resolution source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectTemplate {
    pub tileset: Option<TemplateTileset>,
    pub object: MapObject,
}
