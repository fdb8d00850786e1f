use roxmltree::Node;

use crate::model::{Frame, Image, TerrainType, TileOffset, Tileset, TilesetTile};
use crate::parse::{
    ParseError, attr, attr_or, child_properties, elements, object::parse_object, required,
    resolve_path, string_attr,
};

/// Parse a `<tileset>` element, either a `.tsx` root or one embedded in a map.
pub(super) fn parse_tileset(node: Node, dir: &str) -> Result<Tileset, ParseError> {
    let mut tileset = Tileset {
        name: string_attr(node, "name"),
        first_gid: attr_or(node, "firstgid", 0)?,
        tile_width: attr_or(node, "tilewidth", 0)?,
        tile_height: attr_or(node, "tileheight", 0)?,
        spacing: attr_or(node, "spacing", 0)?,
        margin: attr_or(node, "margin", 0)?,
        columns: attr_or(node, "columns", 0)?,
        tile_count: attr_or(node, "tilecount", 0)?,
        properties: child_properties(node, dir),
        ..Default::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "image" => tileset.image = Some(parse_image(child, dir)?),
            "tileoffset" => {
                tileset.tile_offset = TileOffset {
                    x: attr_or(child, "x", 0)?,
                    y: attr_or(child, "y", 0)?,
                };
            }
            "terraintypes" => {
                for terrain in elements(child).filter(|node| node.has_tag_name("terrain")) {
                    tileset.terrain_types.push(TerrainType {
                        name: string_attr(terrain, "name"),
                        tile: attr_or(terrain, "tile", -1)?,
                        properties: child_properties(terrain, dir),
                    });
                }
            }
            "tile" => tileset.tiles.push(parse_tile(child, dir)?),
            _ => {}
        }
    }

    Ok(tileset)
}

fn parse_tile(node: Node, dir: &str) -> Result<TilesetTile, ParseError> {
    let mut tile = TilesetTile::new(required(node, "id")?);
    tile.tile_type = node
        .attribute("class")
        .or_else(|| node.attribute("type"))
        .unwrap_or_default()
        .to_string();
    tile.terrain = node.attribute("terrain").map(str::to_string);
    tile.probability = attr_or(node, "probability", 1.0)?;
    tile.properties = child_properties(node, dir);

    for child in elements(node) {
        match child.tag_name().name() {
            "image" => tile.image = Some(parse_image(child, dir)?),
            "objectgroup" => {
                for object in elements(child).filter(|node| node.has_tag_name("object")) {
                    tile.objects.push(parse_object(object, dir)?);
                }
            }
            "animation" => {
                for frame in elements(child).filter(|node| node.has_tag_name("frame")) {
                    tile.animation.push(Frame {
                        tile_id: required(frame, "tileid")?,
                        duration: required(frame, "duration")?,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(tile)
}

/// Parse an `<image>` element. Embedded image data is not supported.
pub(super) fn parse_image(node: Node, dir: &str) -> Result<Image, ParseError> {
    let Some(source) = node.attribute("source") else {
        return Err(ParseError::Unsupported("embedded images"));
    };
    Ok(Image {
        source: resolve_path(dir, source),
        width: attr(node, "width")?,
        height: attr(node, "height")?,
    })
}
