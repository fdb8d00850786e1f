use roxmltree::Node;

use crate::field::Field;
use crate::model::{MapObject, ObjectTemplate, Point, TemplateTileset};
use crate::parse::{
    ParseError, attr, bool_attr, child_properties, elements, required, resolve_path,
};

/// Parse an `<object>` element.
///
/// Only attributes present in the document are set; everything else stays
/// [`Field::Unset`] so a template can fill it later.
pub(super) fn parse_object(node: Node, dir: &str) -> Result<MapObject, ParseError> {
    let mut object = MapObject {
        id: attr::<u32>(node, "id")?.into(),
        name: node.attribute("name").map(str::to_string).into(),
        // `class` replaced `type` in Tiled 1.9
        object_type: node
            .attribute("class")
            .or_else(|| node.attribute("type"))
            .map(str::to_string)
            .into(),
        gid: attr::<u32>(node, "gid")?.into(),
        x: attr::<f32>(node, "x")?.into(),
        y: attr::<f32>(node, "y")?.into(),
        width: attr::<f32>(node, "width")?.into(),
        height: attr::<f32>(node, "height")?.into(),
        rotation: attr::<f32>(node, "rotation")?.into(),
        visible: bool_attr(node, "visible")?.into(),
        template: node
            .attribute("template")
            .map(|template| resolve_path(dir, template)),
        properties: child_properties(node, dir),
        ..Default::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "ellipse" => object.ellipse = Field::Set(()),
            "polygon" => object.polygon = Field::Set(parse_points(child)?),
            "polyline" => object.polyline = Field::Set(parse_points(child)?),
            // Points and text have no runtime shape of their own
            _ => {}
        }
    }

    Ok(object)
}

/// Parse the `points` attribute (`"x1,y1 x2,y2 ..."`).
fn parse_points(node: Node) -> Result<Vec<Point>, ParseError> {
    let points = node.attribute("points").unwrap_or_default();
    let invalid = || ParseError::InvalidAttributeValue {
        attribute: String::from("points"),
        value: points.to_string(),
    };

    points
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
            let x = x.parse().map_err(|_| invalid())?;
            let y = y.parse().map_err(|_| invalid())?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Parse a `<template>` root element.
pub(super) fn parse_template(node: Node, dir: &str) -> Result<ObjectTemplate, ParseError> {
    let mut template = ObjectTemplate::default();
    let mut found_object = false;

    for child in elements(node) {
        match child.tag_name().name() {
            "tileset" => {
                let source: String = required(child, "source")?;
                template.tileset = Some(TemplateTileset {
                    first_gid: required(child, "firstgid")?,
                    source: resolve_path(dir, &source),
                });
            }
            "object" => {
                template.object = parse_object(child, dir)?;
                found_object = true;
            }
            _ => {}
        }
    }

    if !found_object {
        return Err(ParseError::MissingElement {
            parent: "template",
            element: "object",
        });
    }
    Ok(template)
}
