use std::io::Write;

use thiserror::Error;

use crate::model::{
    Layer, LayerKind, Map, MapObject, ObjectShape, Point, Property, Tileset, TilesetEntry,
    TilesetTile,
};
use crate::protocol::{BinaryWriter, LayerTag, ShapeTag, WireTag};

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to write baked data: {0}")]
    Io(#[from] std::io::Error),

    #[error("tileset '{path}' (first gid {first_gid}) was never loaded")]
    UnresolvedTileset { first_gid: u32, path: String },

    #[error("length {0} does not fit in a u32")]
    LengthOverflow(usize),
}

/// Write a fully assembled map.
///
/// # Errors
///
/// Fails with [`SerializeError::UnresolvedTileset`] if an external tileset
/// was not loaded, or with [`SerializeError::Io`] if `out` fails.
pub fn write_map<W: Write>(out: W, map: &Map) -> Result<(), SerializeError> {
    let mut writer = BinaryWriter::new(out);

    let background = map.background_color.unwrap_or_default();
    writer.write_u8(background.r)?;
    writer.write_u8(background.g)?;
    writer.write_u8(background.b)?;
    writer.write_u8(map.render_order.to_tag())?;
    writer.write_u32(map.width)?;
    writer.write_u32(map.height)?;
    writer.write_u32(map.tile_width)?;
    writer.write_u32(map.tile_height)?;
    writer.write_u8(map.orientation.to_tag())?;
    write_properties(&mut writer, &map.properties)?;

    writer.write_len(map.tilesets.len())?;
    for entry in &map.tilesets {
        match entry {
            TilesetEntry::Inline(tileset) => write_tileset_record(&mut writer, tileset)?,
            TilesetEntry::External { first_gid, source } => {
                return Err(SerializeError::UnresolvedTileset {
                    first_gid: *first_gid,
                    path: source.clone(),
                });
            }
        }
    }

    write_layers(&mut writer, &map.layers)
}

/// Write a standalone tileset.
pub fn write_tileset<W: Write>(out: W, tileset: &Tileset) -> Result<(), SerializeError> {
    write_tileset_record(&mut BinaryWriter::new(out), tileset)
}

fn write_tileset_record<W: Write>(
    writer: &mut BinaryWriter<W>,
    tileset: &Tileset,
) -> Result<(), SerializeError> {
    let image = tileset
        .image
        .as_ref()
        .map(|image| image_reference(&image.source))
        .unwrap_or_default();
    writer.write_str(image)?;
    writer.write_u32(tileset.first_gid)?;
    writer.write_u32(tileset.tile_width)?;
    writer.write_u32(tileset.tile_height)?;
    writer.write_u32(tileset.spacing)?;
    writer.write_u32(tileset.margin)?;
    writer.write_u32(tileset.columns)?;
    writer.write_u32(tileset.tile_count)?;

    writer.write_len(tileset.tiles.len())?;
    for tile in &tileset.tiles {
        write_tile(writer, tile)?;
    }

    write_properties(writer, &tileset.properties)?;
    writer.write_i32(tileset.tile_offset.x)?;
    writer.write_i32(tileset.tile_offset.y)
}

fn write_tile<W: Write>(
    writer: &mut BinaryWriter<W>,
    tile: &TilesetTile,
) -> Result<(), SerializeError> {
    writer.write_u32(tile.id)?;
    writer.write_str(&tile.tile_type)?;
    writer.write_len(tile.animation.len())?;
    writer.write_len(tile.objects.len())?;
    for object in &tile.objects {
        write_object(writer, object)?;
    }
    for frame in &tile.animation {
        writer.write_u32(frame.tile_id)?;
        writer.write_u32(frame.duration)?;
    }
    write_properties(writer, &tile.properties)?;
    let image = tile
        .image
        .as_ref()
        .map(|image| image_reference(&image.source))
        .unwrap_or_default();
    writer.write_str(image)
}

fn write_layers<W: Write>(
    writer: &mut BinaryWriter<W>,
    layers: &[Layer],
) -> Result<(), SerializeError> {
    writer.write_len(layers.len())?;
    for layer in layers {
        write_layer(writer, layer)?;
    }
    Ok(())
}

fn write_layer<W: Write>(writer: &mut BinaryWriter<W>, layer: &Layer) -> Result<(), SerializeError> {
    writer.write_str(&layer.name)?;
    writer.write_bool(layer.visible)?;
    writer.write_f32(layer.opacity)?;

    match &layer.kind {
        LayerKind::Tiles(tiles) => {
            writer.write_u8(LayerTag::Tiles as u8)?;
            writer.write_len(tiles.tiles.len())?;
            for tile in &tiles.tiles {
                writer.write_u32(tile.gid)?;
                writer.write_u32(tile.x)?;
                writer.write_u32(tile.y)?;
            }
            writer.write_u32(tiles.width)?;
            writer.write_u32(tiles.height)?;
        }
        LayerKind::Image(image) => {
            writer.write_u8(LayerTag::Image as u8)?;
            let source = image
                .image
                .as_ref()
                .map(|image| image_reference(&image.source))
                .unwrap_or_default();
            writer.write_str(source)?;
            write_point(writer, image.position)?;
        }
        LayerKind::Objects(objects) => {
            writer.write_u8(LayerTag::Objects as u8)?;
            writer.write_len(objects.objects.len())?;
            for object in &objects.objects {
                write_object(writer, object)?;
            }
        }
        LayerKind::Group(group) => {
            writer.write_u8(LayerTag::Group as u8)?;
            write_layers(writer, &group.layers)?;
        }
    }

    write_point(writer, layer.offset)?;
    write_properties(writer, &layer.properties)
}

/// Unset fields are written as their defaults; objects are visible unless
/// stated otherwise.
fn write_object<W: Write>(
    writer: &mut BinaryWriter<W>,
    object: &MapObject,
) -> Result<(), SerializeError> {
    let shape = object.shape();
    let tag = match &shape {
        ObjectShape::Rectangle => ShapeTag::Rectangle,
        ObjectShape::Ellipse => ShapeTag::Ellipse,
        ObjectShape::Polygon(_) => ShapeTag::Polygon,
        ObjectShape::Polyline(_) => ShapeTag::Polyline,
        ObjectShape::Tile(_) => ShapeTag::Tile,
    };

    writer.write_u8(tag as u8)?;
    writer.write_u32(object.id.value_or_default())?;
    writer.write_str(object.name.get().map(String::as_str).unwrap_or_default())?;
    writer.write_str(object.object_type.get().map(String::as_str).unwrap_or_default())?;
    writer.write_f32(object.x.value_or_default())?;
    writer.write_f32(object.y.value_or_default())?;
    writer.write_f32(object.width.value_or_default())?;
    writer.write_f32(object.height.value_or_default())?;
    writer.write_f32(object.rotation.value_or_default())?;
    writer.write_bool(object.visible.value_or(true))?;
    write_properties(writer, &object.properties)?;

    match shape {
        ObjectShape::Tile(gid) => writer.write_u32(gid)?,
        ObjectShape::Polygon(points) | ObjectShape::Polyline(points) => {
            writer.write_len(points.len())?;
            for point in points {
                write_point(writer, point)?;
            }
        }
        ObjectShape::Rectangle | ObjectShape::Ellipse => {}
    }
    Ok(())
}

fn write_point<W: Write>(writer: &mut BinaryWriter<W>, point: Point) -> Result<(), SerializeError> {
    writer.write_f32(point.x)?;
    writer.write_f32(point.y)
}

fn write_properties<W: Write>(
    writer: &mut BinaryWriter<W>,
    properties: &[Property],
) -> Result<(), SerializeError> {
    writer.write_len(properties.len())?;
    for property in properties {
        writer.write_str(&property.name)?;
        writer.write_str(&property.value)?;
        write_properties(writer, &property.children)?;
    }
    Ok(())
}

/// The baked form of an image path: the path without its file extension.
pub fn image_reference(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[name_start..].rfind('.') {
        // Dot files have no extension
        None | Some(0) => path,
        Some(dot) => &path[..name_start + dot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::model::{Color, RenderOrder};

    #[test]
    fn test_image_reference_strips_extension() {
        assert_eq!(image_reference("images/dungeon.png"), "images/dungeon");
        assert_eq!(image_reference("a.b/c"), "a.b/c");
        assert_eq!(image_reference("sky.tar.gz"), "sky.tar");
        assert_eq!(image_reference("maps/.hidden"), "maps/.hidden");
        assert_eq!(image_reference(""), "");
    }

    #[test]
    fn test_header_layout() {
        let map = Map {
            background_color: Some(Color::rgb(1, 2, 3)),
            render_order: RenderOrder::LeftDown,
            width: 10,
            height: 20,
            tile_width: 16,
            tile_height: 8,
            ..Default::default()
        };
        let mut bytes = Vec::new();
        write_map(&mut bytes, &map).unwrap();

        #[rustfmt::skip]
        let expected = [
            1, 2, 3,
            2,
            10, 0, 0, 0,
            20, 0, 0, 0,
            16, 0, 0, 0,
            8, 0, 0, 0,
            0,
            0, 0, 0, 0, // properties
            0, 0, 0, 0, // tilesets
            0, 0, 0, 0, // layers
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_unresolved_tileset_fails() {
        let map = Map {
            tilesets: vec![TilesetEntry::External {
                first_gid: 1,
                source: String::from("tilesets/a.tsx"),
            }],
            ..Default::default()
        };
        let err = write_map(Vec::new(), &map).unwrap_err();
        assert!(matches!(err, SerializeError::UnresolvedTileset { first_gid: 1, .. }));
    }

    #[test]
    fn test_object_defaults() {
        let mut bytes = Vec::new();
        write_object(&mut BinaryWriter::new(&mut bytes), &MapObject::default()).unwrap();

        // tag, id, two empty strings, five floats, visible, no properties
        assert_eq!(bytes.len(), 1 + 4 + 4 + 4 + 5 * 4 + 1 + 4);
        assert_eq!(bytes[0], ShapeTag::Rectangle as u8);
        assert_eq!(bytes[33], 1);

        let hidden = MapObject {
            visible: Field::Set(false),
            ..Default::default()
        };
        bytes.clear();
        write_object(&mut BinaryWriter::new(&mut bytes), &hidden).unwrap();
        assert_eq!(bytes[33], 0);
    }
}
