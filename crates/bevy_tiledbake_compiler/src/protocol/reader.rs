use thiserror::Error;

use crate::model::{Color, Frame, ObjectShape, PlacedTile, Point, Property, TileOffset};
use crate::protocol::{
    LayerTag, RuntimeLayer, RuntimeLayerKind, RuntimeMap, RuntimeObject, RuntimeTile,
    RuntimeTileset, ShapeTag, WireTag,
};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unexpected end of data at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("invalid {kind} tag {tag} at byte {offset}")]
    InvalidTag {
        kind: &'static str,
        tag: u8,
        offset: usize,
    },

    #[error("invalid UTF-8 in string at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("{count} trailing bytes after the end of the stream")]
    TrailingBytes { count: usize },

    #[error("records nested deeper than {limit} levels at byte {offset}")]
    TooDeep { limit: usize, offset: usize },
}

/// Deepest nesting of group layers or child properties a stream may use.
pub const MAX_NESTING: usize = 64;

/// Read a baked map stream.
pub fn read_map(data: &[u8]) -> Result<RuntimeMap, ReadError> {
    let mut reader = BinaryReader::new(data);
    let map = reader.read_map()?;
    reader.finish()?;
    Ok(map)
}

/// Read a baked standalone tileset stream.
pub fn read_tileset(data: &[u8]) -> Result<RuntimeTileset, ReadError> {
    let mut reader = BinaryReader::new(data);
    let tileset = reader.read_tileset()?;
    reader.finish()?;
    Ok(tileset)
}

/// Cursor over a baked stream. Mirrors the writer record by record.
struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> BinaryReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    fn finish(&self) -> Result<(), ReadError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(ReadError::TrailingBytes { count }),
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let start = self.pos;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or(ReadError::UnexpectedEof { offset: start })?;
        self.pos += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.array::<1>()?[0])
    }

    fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.array().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.array().map(i32::from_le_bytes)
    }

    fn read_f32(&mut self) -> Result<f32, ReadError> {
        self.array().map(f32::from_le_bytes)
    }

    fn read_bool(&mut self) -> Result<bool, ReadError> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(ReadError::InvalidTag {
                kind: "bool",
                tag,
                offset,
            }),
        }
    }

    fn read_len(&mut self) -> Result<usize, ReadError> {
        Ok(self.read_u32()? as usize)
    }

    /// Run `read` one nesting level down.
    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, ReadError>,
    ) -> Result<T, ReadError> {
        if self.depth >= MAX_NESTING {
            return Err(ReadError::TooDeep {
                limit: MAX_NESTING,
                offset: self.pos,
            });
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Capacity is capped to the bytes left so a corrupt count fails with EOF
    /// instead of a huge allocation.
    fn with_capacity<T>(&self, len: usize) -> Vec<T> {
        Vec::with_capacity(len.min(self.remaining()))
    }

    fn read_string(&mut self) -> Result<String, ReadError> {
        let len = self.read_len()?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::InvalidUtf8 { offset })
    }

    fn read_tag<T: WireTag>(&mut self) -> Result<T, ReadError> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        T::from_tag(tag).ok_or(ReadError::InvalidTag {
            kind: T::KIND,
            tag,
            offset,
        })
    }

    fn read_point(&mut self) -> Result<Point, ReadError> {
        Ok(Point::new(self.read_f32()?, self.read_f32()?))
    }

    fn read_map(&mut self) -> Result<RuntimeMap, ReadError> {
        let [r, g, b] = self.array::<3>()?;
        let mut map = RuntimeMap {
            background_color: Color::rgb(r, g, b),
            render_order: self.read_tag()?,
            width: self.read_u32()?,
            height: self.read_u32()?,
            tile_width: self.read_u32()?,
            tile_height: self.read_u32()?,
            orientation: self.read_tag()?,
            properties: self.read_properties()?,
            ..Default::default()
        };

        let count = self.read_len()?;
        map.tilesets = self.with_capacity(count);
        for _ in 0..count {
            map.tilesets.push(self.read_tileset()?);
        }

        map.layers = self.read_layers()?;
        Ok(map)
    }

    fn read_tileset(&mut self) -> Result<RuntimeTileset, ReadError> {
        let mut tileset = RuntimeTileset {
            image: self.read_string()?,
            first_gid: self.read_u32()?,
            tile_width: self.read_u32()?,
            tile_height: self.read_u32()?,
            spacing: self.read_u32()?,
            margin: self.read_u32()?,
            columns: self.read_u32()?,
            tile_count: self.read_u32()?,
            ..Default::default()
        };

        let count = self.read_len()?;
        tileset.tiles = self.with_capacity(count);
        for _ in 0..count {
            tileset.tiles.push(self.read_tile()?);
        }

        tileset.properties = self.read_properties()?;
        tileset.tile_offset = TileOffset {
            x: self.read_i32()?,
            y: self.read_i32()?,
        };
        Ok(tileset)
    }

    fn read_tile(&mut self) -> Result<RuntimeTile, ReadError> {
        let id = self.read_u32()?;
        let tile_type = self.read_string()?;
        let frame_count = self.read_len()?;
        let object_count = self.read_len()?;

        let mut objects = self.with_capacity(object_count);
        for _ in 0..object_count {
            objects.push(self.read_object()?);
        }
        let mut animation = self.with_capacity(frame_count);
        for _ in 0..frame_count {
            animation.push(Frame {
                tile_id: self.read_u32()?,
                duration: self.read_u32()?,
            });
        }

        Ok(RuntimeTile {
            id,
            tile_type,
            objects,
            animation,
            properties: self.read_properties()?,
            image: self.read_string()?,
        })
    }

    fn read_layers(&mut self) -> Result<Vec<RuntimeLayer>, ReadError> {
        let count = self.read_len()?;
        let mut layers = self.with_capacity(count);
        for _ in 0..count {
            layers.push(self.read_layer()?);
        }
        Ok(layers)
    }

    fn read_layer(&mut self) -> Result<RuntimeLayer, ReadError> {
        let name = self.read_string()?;
        let visible = self.read_bool()?;
        let opacity = self.read_f32()?;

        let offset = self.pos;
        let tag = self.read_u8()?;
        let kind = match LayerTag::from_u8(tag) {
            Some(LayerTag::Tiles) => {
                let count = self.read_len()?;
                let mut tiles = self.with_capacity(count);
                for _ in 0..count {
                    tiles.push(PlacedTile {
                        gid: self.read_u32()?,
                        x: self.read_u32()?,
                        y: self.read_u32()?,
                    });
                }
                RuntimeLayerKind::Tiles {
                    tiles,
                    width: self.read_u32()?,
                    height: self.read_u32()?,
                }
            }
            Some(LayerTag::Image) => RuntimeLayerKind::Image {
                image: self.read_string()?,
                position: self.read_point()?,
            },
            Some(LayerTag::Objects) => {
                let count = self.read_len()?;
                let mut objects = self.with_capacity(count);
                for _ in 0..count {
                    objects.push(self.read_object()?);
                }
                RuntimeLayerKind::Objects(objects)
            }
            Some(LayerTag::Group) => {
                RuntimeLayerKind::Group(self.nested(Self::read_layers)?)
            }
            None => {
                return Err(ReadError::InvalidTag {
                    kind: "layer",
                    tag,
                    offset,
                });
            }
        };

        Ok(RuntimeLayer {
            name,
            visible,
            opacity,
            kind,
            offset: self.read_point()?,
            properties: self.read_properties()?,
        })
    }

    fn read_object(&mut self) -> Result<RuntimeObject, ReadError> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        let shape_tag = ShapeTag::from_u8(tag).ok_or(ReadError::InvalidTag {
            kind: "shape",
            tag,
            offset,
        })?;

        let mut object = RuntimeObject {
            id: self.read_u32()?,
            name: self.read_string()?,
            object_type: self.read_string()?,
            x: self.read_f32()?,
            y: self.read_f32()?,
            width: self.read_f32()?,
            height: self.read_f32()?,
            rotation: self.read_f32()?,
            visible: self.read_bool()?,
            shape: ObjectShape::Rectangle,
            properties: self.read_properties()?,
        };

        object.shape = match shape_tag {
            ShapeTag::Rectangle => ObjectShape::Rectangle,
            ShapeTag::Ellipse => ObjectShape::Ellipse,
            ShapeTag::Polygon => ObjectShape::Polygon(self.read_points()?),
            ShapeTag::Polyline => ObjectShape::Polyline(self.read_points()?),
            ShapeTag::Tile => ObjectShape::Tile(self.read_u32()?),
        };
        Ok(object)
    }

    fn read_points(&mut self) -> Result<Vec<Point>, ReadError> {
        let count = self.read_len()?;
        let mut points = self.with_capacity(count);
        for _ in 0..count {
            points.push(self.read_point()?);
        }
        Ok(points)
    }

    fn read_properties(&mut self) -> Result<Vec<Property>, ReadError> {
        let count = self.read_len()?;
        let mut properties = self.with_capacity(count);
        for _ in 0..count {
            properties.push(Property {
                name: self.read_string()?,
                value: self.read_string()?,
                children: self.nested(Self::read_properties)?,
            });
        }
        Ok(properties)
    }
}
