//! Ingestion of Tiled XML documents (`.tmx`, `.tsx`, `.tx`).
//!
//! The parser only maps the XML onto the [`crate::model`] graph. It does not
//! load referenced files, decode tile data, or apply templates; all of that
//! is the assembler's job. File references are resolved against the directory
//! of the document being parsed and normalized, so a reference reads the same
//! no matter which file it came from.

mod map;
mod object;
mod tileset;

use std::path::Path;
use std::str::FromStr;

use normalize_path::NormalizePath;
use roxmltree::{Document, Node};
use thiserror::Error;

use crate::model::{Map, ObjectTemplate, Property, Tileset};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{parent}> is missing a <{element}> element")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },

    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttributeValue { attribute: String, value: String },

    #[error("{0} are not supported")]
    Unsupported(&'static str),
}

/// Parse a `.tmx` document located at `path`.
pub fn parse_map(text: &str, path: &str) -> Result<Map, ParseError> {
    let doc = Document::parse(text)?;
    let root = expect_root(&doc, "map")?;
    map::parse_map(root, &parent_dir(path))
}

/// Parse a `.tsx` document located at `path`.
pub fn parse_tileset(text: &str, path: &str) -> Result<Tileset, ParseError> {
    let doc = Document::parse(text)?;
    let root = expect_root(&doc, "tileset")?;
    let mut tileset = tileset::parse_tileset(root, &parent_dir(path))?;
    tileset.source = Some(path.to_string());
    Ok(tileset)
}

/// Parse a `.tx` document located at `path`.
pub fn parse_template(text: &str, path: &str) -> Result<ObjectTemplate, ParseError> {
    let doc = Document::parse(text)?;
    let root = expect_root(&doc, "template")?;
    object::parse_template(root, &parent_dir(path))
}

fn expect_root<'a, 'input>(
    doc: &'a Document<'input>,
    expected: &'static str,
) -> Result<Node<'a, 'input>, ParseError> {
    let root = doc.root_element();
    let found = root.tag_name().name();
    if found != expected {
        return Err(ParseError::UnexpectedRoot {
            expected,
            found: found.to_string(),
        });
    }
    Ok(root)
}

fn parent_dir(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|parent| parent.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

/// Resolve `reference` against `dir` and normalize `.`/`..` components.
///
/// Results use forward slashes. References that are already absolute are
/// only normalized.
pub fn resolve_path(dir: &str, reference: &str) -> String {
    Path::new(dir)
        .join(reference)
        .normalize()
        .to_string_lossy()
        .replace('\\', "/")
}

/// Element children of `node`, skipping text and comments.
fn elements<'a, 'input: 'a>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Optional attribute parsed with [`FromStr`].
fn attr<T: FromStr>(node: Node, name: &'static str) -> Result<Option<T>, ParseError> {
    node.attribute(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidAttributeValue {
                    attribute: name.to_string(),
                    value: value.to_string(),
                })
        })
        .transpose()
}

fn attr_or<T: FromStr>(node: Node, name: &'static str, default: T) -> Result<T, ParseError> {
    Ok(attr(node, name)?.unwrap_or(default))
}

fn required<T: FromStr>(node: Node, name: &'static str) -> Result<T, ParseError> {
    attr(node, name)?.ok_or_else(|| ParseError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name,
    })
}

/// Tiled booleans are written as `0`/`1`.
fn bool_attr(node: Node, name: &'static str) -> Result<Option<bool>, ParseError> {
    match node.attribute(name) {
        None => Ok(None),
        Some("1" | "true") => Ok(Some(true)),
        Some("0" | "false") => Ok(Some(false)),
        Some(value) => Err(ParseError::InvalidAttributeValue {
            attribute: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn string_attr(node: Node, name: &'static str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

/// Properties of the first `<properties>` child of `node`, if any.
fn child_properties(node: Node, dir: &str) -> Vec<Property> {
    elements(node)
        .find(|child| child.has_tag_name("properties"))
        .map(|properties| parse_properties(properties, dir))
        .unwrap_or_default()
}

fn parse_properties(properties: Node, dir: &str) -> Vec<Property> {
    elements(properties)
        .filter(|child| child.has_tag_name("property"))
        .map(|property| parse_property(property, dir))
        .collect()
}

fn parse_property(node: Node, dir: &str) -> Property {
    let name = string_attr(node, "name");
    // Multi-line string values are stored as element text instead of `value`
    let value = node
        .attribute("value")
        .or_else(|| elements(node).next().is_none().then(|| node.text()).flatten())
        .unwrap_or_default();
    let value = match node.attribute("type") {
        Some("file") if !value.is_empty() => resolve_path(dir, value),
        _ => value.to_string(),
    };
    Property {
        name,
        value,
        children: child_properties(node, dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_normalizes() {
        assert_eq!(resolve_path("maps/town", "../tilesets/a.tsx"), "maps/tilesets/a.tsx");
        assert_eq!(resolve_path("maps", "./b.tx"), "maps/b.tx");
        assert_eq!(resolve_path("", "c.png"), "c.png");
    }

    #[test]
    fn test_parse_properties_with_class_members() {
        let xml = r#"
            <object>
              <properties>
                <property name="speed" type="float" value="2.5"/>
                <property name="notes">line one
line two</property>
                <property name="script" type="file" value="../scripts/door.lua"/>
                <property name="physics" type="class" propertytype="Body">
                  <properties>
                    <property name="mass" type="int" value="3"/>
                  </properties>
                </property>
              </properties>
            </object>"#;
        let doc = Document::parse(xml).unwrap();
        let properties = child_properties(doc.root_element(), "maps");

        assert_eq!(properties.len(), 4);
        assert_eq!(properties[0], Property::new("speed", "2.5"));
        assert_eq!(properties[1].value, "line one\nline two");
        assert_eq!(properties[2].value, "scripts/door.lua");
        assert_eq!(properties[3].children, vec![Property::new("mass", "3")]);
    }

    #[test]
    fn test_unexpected_root() {
        let err = parse_tileset("<map/>", "maps/a.tsx").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { expected: "tileset", .. }));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_map("<map", "a.tmx").unwrap_err(),
            ParseError::Xml(_)
        ));
    }
}
