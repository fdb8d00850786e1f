use crate::field::Field;
use crate::model::{Property, merge_properties};

/// A 2D point, relative to the owning object's position for polygons/polylines.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An object as authored, on a map object layer, a tileset tile, or a template.
///
/// Every field a template can provide is a [`Field`], so an object can tell
/// "not written" apart from "written as zero".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapObject {
    pub id: Field<u32>,
    pub name: Field<String>,
    pub object_type: Field<String>,
    /// Global tile id (flip flags included) for tile objects.
    pub gid: Field<u32>,
    pub x: Field<f32>,
    pub y: Field<f32>,
    pub width: Field<f32>,
    pub height: Field<f32>,
    /// Rotation in degrees, clockwise.
    pub rotation: Field<f32>,
    pub visible: Field<bool>,
    pub ellipse: Field<()>,
    pub polygon: Field<Vec<Point>>,
    pub polyline: Field<Vec<Point>>,
    /// Normalized path of the template this object instantiates.
    pub template: Option<String>,
    pub properties: Vec<Property>,
}

/// Geometry of a resolved object.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    /// Tile-anchored object, carrying its global tile id.
    Tile(u32),
}

impl MapObject {
    /// Fill every unset field from `template` and merge its properties.
    ///
    /// Explicitly set fields are never touched, and instance properties win over
    /// template properties with the same name. Calling this twice with the same
    /// template is a no-op the second time.
    pub fn inherit(&mut self, template: &MapObject) {
        self.gid.inherit(&template.gid);
        self.height.inherit(&template.height);
        self.id.inherit(&template.id);
        self.rotation.inherit(&template.rotation);
        self.visible.inherit(&template.visible);
        self.width.inherit(&template.width);
        self.x.inherit(&template.x);
        self.y.inherit(&template.y);

        self.ellipse.inherit(&template.ellipse);
        self.polygon.inherit(&template.polygon);
        self.polyline.inherit(&template.polyline);
        self.name.inherit(&template.name);
        self.object_type.inherit(&template.object_type);

        merge_properties(&mut self.properties, &template.properties);
    }

    /// Derive the geometry by first match: tile, ellipse, polygon, polyline,
    /// then rectangle.
    pub fn shape(&self) -> ObjectShape {
        if let Field::Set(gid) = &self.gid
            && *gid != 0
        {
            return ObjectShape::Tile(*gid);
        }
        if self.ellipse.is_set() {
            return ObjectShape::Ellipse;
        }
        if let Field::Set(points) = &self.polygon {
            return ObjectShape::Polygon(points.clone());
        }
        if let Field::Set(points) = &self.polyline {
            return ObjectShape::Polyline(points.clone());
        }
        ObjectShape::Rectangle
    }

    /// Human-readable label used in error context.
    pub fn label(&self) -> String {
        match (&self.name, &self.id) {
            (Field::Set(name), _) if !name.is_empty() => name.clone(),
            (_, Field::Set(id)) => format!("#{id}"),
            _ => String::from("<unnamed>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_object() -> MapObject {
        MapObject {
            name: Field::Set("chest".into()),
            x: Field::Set(10.0),
            y: Field::Set(20.0),
            width: Field::Set(16.0),
            visible: Field::Set(true),
            properties: vec![Property::new("loot", "gold")],
            ..Default::default()
        }
    }

    #[test]
    fn test_inherit_unset_x_takes_template() {
        let mut object = MapObject::default();
        object.inherit(&template_object());
        assert_eq!(object.x, Field::Set(10.0));
        assert_eq!(object.name, Field::Set("chest".into()));
    }

    #[test]
    fn test_inherit_explicit_zero_survives() {
        let mut object = MapObject {
            x: Field::Set(0.0),
            visible: Field::Set(false),
            ..Default::default()
        };
        object.inherit(&template_object());
        assert_eq!(object.x, Field::Set(0.0));
        assert_eq!(object.visible, Field::Set(false));
        assert_eq!(object.y, Field::Set(20.0));
    }

    #[test]
    fn test_inherit_is_idempotent() {
        let template = template_object();
        let mut object = MapObject {
            properties: vec![Property::new("loot", "silver")],
            ..Default::default()
        };
        object.inherit(&template);
        let once = object.clone();
        object.inherit(&template);
        assert_eq!(object, once);
        assert_eq!(object.properties, vec![Property::new("loot", "silver")]);
    }

    #[test]
    fn test_shape_priority() {
        let mut object = MapObject {
            ellipse: Field::Set(()),
            polygon: Field::Set(vec![Point::new(0.0, 0.0)]),
            ..Default::default()
        };
        assert_eq!(object.shape(), ObjectShape::Ellipse);

        object.gid = Field::Set(0);
        assert_eq!(object.shape(), ObjectShape::Ellipse);

        object.gid = Field::Set(3);
        assert_eq!(object.shape(), ObjectShape::Tile(3));

        let polyline = MapObject {
            polyline: Field::Set(vec![Point::new(1.0, 2.0)]),
            ..Default::default()
        };
        assert_eq!(
            polyline.shape(),
            ObjectShape::Polyline(vec![Point::new(1.0, 2.0)])
        );
        assert_eq!(MapObject::default().shape(), ObjectShape::Rectangle);
    }
}
