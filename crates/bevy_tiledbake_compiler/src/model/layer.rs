use crate::model::{Image, MapObject, Point, Property};

/// A layer of a map, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub opacity: f32,
    pub visible: bool,
    pub offset: Point,
    pub properties: Vec<Property>,
    pub kind: LayerKind,
}

impl Layer {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            offset: Point::default(),
            properties: Vec::new(),
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayerKind {
    Tiles(TileLayer),
    Image(ImageLayer),
    Objects(ObjectLayer),
    Group(GroupLayer),
}

/// A grid of tiles.
///
/// `data` is what the document carried; `tiles` is filled by the assembler
/// once the data has been decoded and sequenced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileLayer {
    pub width: u32,
    pub height: u32,
    pub data: TileData,
    pub tiles: Vec<PlacedTile>,
}

/// Encoded tile layer payload, exactly as authored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileData {
    /// `None` for inline `<tile>` records, otherwise the encoding tag (`csv`, `base64`, ...).
    pub encoding: Option<String>,
    /// Compression tag (`gzip`, `zlib`, ...), if any.
    pub compression: Option<String>,
    pub payload: TilePayload,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TilePayload {
    /// Already materialized per-cell global ids.
    Cells(Vec<u32>),
    /// Text content of the `<data>` element.
    Text(String),
}

impl Default for TilePayload {
    fn default() -> Self {
        TilePayload::Cells(Vec::new())
    }
}

/// A non-empty cell, in paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedTile {
    pub gid: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageLayer {
    pub image: Option<Image>,
    pub position: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectLayer {
    pub objects: Vec<MapObject>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupLayer {
    pub layers: Vec<Layer>,
}
