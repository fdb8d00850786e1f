use roxmltree::Node;

use crate::model::{
    Color, GroupLayer, ImageLayer, Layer, LayerKind, Map, ObjectLayer, Orientation, Point,
    RenderOrder, TileData, TileLayer, TilePayload, TilesetEntry,
};
use crate::parse::{
    ParseError, attr_or, bool_attr, child_properties, elements, object::parse_object, required,
    resolve_path, string_attr, tileset::parse_image, tileset::parse_tileset,
};

/// Parse a `<map>` root element.
pub(super) fn parse_map(node: Node, dir: &str) -> Result<Map, ParseError> {
    if bool_attr(node, "infinite")? == Some(true) {
        return Err(ParseError::Unsupported("infinite maps"));
    }

    let mut map = Map {
        width: attr_or(node, "width", 0)?,
        height: attr_or(node, "height", 0)?,
        tile_width: attr_or(node, "tilewidth", 0)?,
        tile_height: attr_or(node, "tileheight", 0)?,
        properties: child_properties(node, dir),
        ..Default::default()
    };

    if let Some(value) = node.attribute("orientation") {
        map.orientation = Orientation::parse(value).ok_or_else(|| invalid("orientation", value))?;
    }
    if let Some(value) = node.attribute("renderorder") {
        map.render_order = RenderOrder::parse(value).ok_or_else(|| invalid("renderorder", value))?;
    }
    if let Some(value) = node.attribute("backgroundcolor") {
        map.background_color =
            Some(Color::parse_hex(value).ok_or_else(|| invalid("backgroundcolor", value))?);
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "tileset" => map.tilesets.push(parse_tileset_entry(child, dir)?),
            _ => {
                if let Some(layer) = parse_layer(child, dir)? {
                    map.layers.push(layer);
                }
            }
        }
    }

    Ok(map)
}

fn invalid(attribute: &str, value: &str) -> ParseError {
    ParseError::InvalidAttributeValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn parse_tileset_entry(node: Node, dir: &str) -> Result<TilesetEntry, ParseError> {
    let first_gid: u32 = required(node, "firstgid")?;
    if first_gid == 0 {
        return Err(invalid("firstgid", "0"));
    }

    match node.attribute("source") {
        Some(source) => Ok(TilesetEntry::External {
            first_gid,
            source: resolve_path(dir, source),
        }),
        None => parse_tileset(node, dir).map(TilesetEntry::Inline),
    }
}

/// Parse a layer element. Returns `None` for elements that are not layers.
fn parse_layer(node: Node, dir: &str) -> Result<Option<Layer>, ParseError> {
    let kind = match node.tag_name().name() {
        "layer" => LayerKind::Tiles(parse_tile_layer(node)?),
        "imagelayer" => LayerKind::Image(ImageLayer {
            image: elements(node)
                .find(|child| child.has_tag_name("image"))
                .map(|image| parse_image(image, dir))
                .transpose()?,
            position: Point::new(attr_or(node, "x", 0.0)?, attr_or(node, "y", 0.0)?),
        }),
        "objectgroup" => LayerKind::Objects(ObjectLayer {
            objects: elements(node)
                .filter(|child| child.has_tag_name("object"))
                .map(|object| parse_object(object, dir))
                .collect::<Result<_, _>>()?,
        }),
        "group" => {
            let mut layers = Vec::new();
            for child in elements(node) {
                if let Some(layer) = parse_layer(child, dir)? {
                    layers.push(layer);
                }
            }
            LayerKind::Group(GroupLayer { layers })
        }
        _ => return Ok(None),
    };

    Ok(Some(Layer {
        name: string_attr(node, "name"),
        opacity: attr_or(node, "opacity", 1.0)?,
        visible: bool_attr(node, "visible")?.unwrap_or(true),
        offset: Point::new(
            attr_or(node, "offsetx", 0.0)?,
            attr_or(node, "offsety", 0.0)?,
        ),
        properties: child_properties(node, dir),
        kind,
    }))
}

fn parse_tile_layer(node: Node) -> Result<TileLayer, ParseError> {
    let mut layer = TileLayer {
        width: required(node, "width")?,
        height: required(node, "height")?,
        ..Default::default()
    };

    if let Some(data) = elements(node).find(|child| child.has_tag_name("data")) {
        let encoding = data.attribute("encoding").map(str::to_string);
        let payload = if encoding.is_some() {
            TilePayload::Text(data.text().unwrap_or_default().to_string())
        } else {
            if elements(data).any(|child| child.has_tag_name("chunk")) {
                return Err(ParseError::Unsupported("chunked tile layers"));
            }
            TilePayload::Cells(
                elements(data)
                    .filter(|child| child.has_tag_name("tile"))
                    .map(|tile| attr_or(tile, "gid", 0))
                    .collect::<Result<_, _>>()?,
            )
        };
        layer.data = TileData {
            encoding,
            compression: data.attribute("compression").map(str::to_string),
            payload,
        };
    }

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use crate::field::Field;
    use crate::model::{Color, LayerKind, Orientation, RenderOrder, TilePayload, TilesetEntry};
    use crate::parse::{self, ParseError};

    const TMX: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="isometric" renderorder="left-up" width="3" height="2" tilewidth="32" tileheight="16" infinite="0" backgroundcolor="#102030">
 <properties>
  <property name="music" value="town.ogg"/>
 </properties>
 <tileset firstgid="1" source="../tilesets/town.tsx"/>
 <tileset firstgid="65" name="inline" tilewidth="32" tileheight="16" tilecount="4" columns="2">
  <image source="inline.png" width="64" height="32"/>
 </tileset>
 <layer id="1" name="Ground" width="3" height="2" opacity="0.5" offsetx="4">
  <data encoding="csv">
1,0,0,
0,5,0
</data>
 </layer>
 <layer id="2" name="Details" width="3" height="2" visible="0">
  <data>
   <tile gid="2"/><tile/><tile/><tile/><tile/><tile gid="3"/>
  </data>
 </layer>
 <group id="3" name="Props">
  <objectgroup id="4" name="Things">
   <object id="1" name="Sign" x="8" y="8"/>
  </objectgroup>
  <imagelayer id="5" name="Sky" x="10" y="20">
   <image source="../images/sky.png"/>
  </imagelayer>
 </group>
</map>"##;

    #[test]
    fn test_parse_tmx() {
        let map = parse::parse_map(TMX, "maps/town.tmx").unwrap();

        assert_eq!(map.orientation, Orientation::Isometric);
        assert_eq!(map.render_order, RenderOrder::LeftUp);
        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!((map.tile_width, map.tile_height), (32, 16));
        assert_eq!(map.background_color, Some(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(map.properties[0].value, "town.ogg");

        assert_eq!(
            map.tilesets[0],
            TilesetEntry::External {
                first_gid: 1,
                source: String::from("tilesets/town.tsx"),
            }
        );
        let TilesetEntry::Inline(inline) = &map.tilesets[1] else {
            panic!("expected an embedded tileset");
        };
        assert_eq!(inline.first_gid, 65);
        assert_eq!(inline.image.as_ref().unwrap().source, "maps/inline.png");

        assert_eq!(map.layers.len(), 3);
        let ground = &map.layers[0];
        assert_eq!(ground.name, "Ground");
        assert_eq!(ground.opacity, 0.5);
        assert_eq!(ground.offset.x, 4.0);
        let LayerKind::Tiles(tiles) = &ground.kind else {
            panic!("expected a tile layer");
        };
        assert_eq!(tiles.data.encoding.as_deref(), Some("csv"));
        assert!(matches!(&tiles.data.payload, TilePayload::Text(text) if text.contains("0,5,0")));

        let details = &map.layers[1];
        assert!(!details.visible);
        let LayerKind::Tiles(tiles) = &details.kind else {
            panic!("expected a tile layer");
        };
        assert_eq!(tiles.data.payload, TilePayload::Cells(vec![2, 0, 0, 0, 0, 3]));

        let LayerKind::Group(group) = &map.layers[2].kind else {
            panic!("expected a group layer");
        };
        let LayerKind::Objects(things) = &group.layers[0].kind else {
            panic!("expected an object layer");
        };
        assert_eq!(things.objects[0].name, Field::Set(String::from("Sign")));
        let LayerKind::Image(sky) = &group.layers[1].kind else {
            panic!("expected an image layer");
        };
        assert_eq!(sky.image.as_ref().unwrap().source, "images/sky.png");
        assert_eq!((sky.position.x, sky.position.y), (10.0, 20.0));
    }

    #[test]
    fn test_parse_infinite_map_unsupported() {
        let err = parse::parse_map(r#"<map infinite="1"/>"#, "a.tmx").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported("infinite maps")));
    }

    #[test]
    fn test_parse_bad_render_order() {
        let err = parse::parse_map(r#"<map renderorder="down"/>"#, "a.tmx").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttributeValue { .. }));
    }
}
