//! Shape definitions for the canvas.

mod group;
mod image;
mod path;
mod rectangle;
mod text;

pub use group::Group;
pub use image::Image;
pub use path::Path;
pub use rectangle::Rectangle;
pub use text::{FontFamily, FontStyle, FontWeight, Text};

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint applied to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color (None = no stroke).
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
    /// `None` leaves the interior transparent.
    pub fill_color: Option<SerializableColor>,
    /// Multiplies the alpha of fill and stroke.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// A filled style with no stroke.
    pub fn filled(color: SerializableColor) -> Self {
        Self {
            stroke_color: None,
            stroke_width: 0.0,
            fill_color: Some(color),
            opacity: 1.0,
        }
    }

    /// An outline-only style.
    pub fn outlined(color: SerializableColor, width: f64) -> Self {
        Self {
            stroke_color: Some(color),
            stroke_width: width,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::filled(SerializableColor::black())
    }
}

pub type ShapeId = Uuid;

/// Geometry and style shared by every drawable.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Axis-aligned bounds in canvas coordinates, ignoring rotation.
    fn bounds(&self) -> Rect;

    /// Whether `point`, in canvas coordinates, lands on the shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Outline as a path.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Transform in place.
    fn transform(&mut self, affine: Affine);
}

/// Shapes whose interior can be painted with a solid color.
pub trait Fillable {
    /// Current fill color.
    fn fill_color(&self) -> Option<SerializableColor>;

    /// Replace the fill color.
    fn set_fill_color(&mut self, color: Option<SerializableColor>);
}

/// Shapes that carry editable text.
pub trait Textual {
    fn content(&self) -> &str;
    fn set_content(&mut self, content: String);
    fn font_family(&self) -> FontFamily;
    fn set_font_family(&mut self, family: FontFamily);
    fn font_size(&self) -> f64;
    fn set_font_size(&mut self, size: f64);
    fn font_weight(&self) -> FontWeight;
    fn set_font_weight(&mut self, weight: FontWeight);
    fn font_style(&self) -> FontStyle;
    fn set_font_style(&mut self, style: FontStyle);
}

/// Any drawable. This is what snapshots and the clipboard store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Path(Path),
    Text(Text),
    Group(Group),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Path(s) => s.id(),
            Shape::Text(s) => s.id(),
            Shape::Group(s) => s.id(),
            Shape::Image(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Path(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Group(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Path(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Group(s) => s.hit_test(point, tolerance),
            Shape::Image(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Path(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Group(s) => s.to_path(),
            Shape::Image(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Path(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Group(s) => s.style(),
            Shape::Image(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Path(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Group(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Path(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
            Shape::Group(s) => s.transform(affine),
            Shape::Image(s) => s.transform(affine),
        }
    }

    /// Move the shape by a delta in world coordinates.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Get the text if this shape is a text.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Query the fill capability.
    pub fn as_fillable(&self) -> Option<&dyn Fillable> {
        match self {
            Shape::Rectangle(s) => Some(s),
            Shape::Path(s) => Some(s),
            Shape::Text(s) => Some(s),
            Shape::Group(_) | Shape::Image(_) => None,
        }
    }

    /// Query the fill capability for mutation.
    pub fn as_fillable_mut(&mut self) -> Option<&mut dyn Fillable> {
        match self {
            Shape::Rectangle(s) => Some(s),
            Shape::Path(s) => Some(s),
            Shape::Text(s) => Some(s),
            Shape::Group(_) | Shape::Image(_) => None,
        }
    }

    /// Query the text capability.
    pub fn as_textual(&self) -> Option<&dyn Textual> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Query the text capability for mutation.
    pub fn as_textual_mut(&mut self) -> Option<&mut dyn Textual> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Give the shape, and any children, fresh ids. Used when pasting.
    /// Group children are renumbered too, so ungrouping a pasted copy
    /// never collides with the original's members.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Path(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
            Shape::Group(s) => {
                s.id = new_id;
                for child in s.children_mut() {
                    child.regenerate_id();
                }
            }
        }
    }

    /// Get the rotation angle in radians.
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Path(s) => s.rotation,
            Shape::Text(s) => s.rotation,
            Shape::Group(s) => s.rotation,
            Shape::Image(s) => s.rotation,
        }
    }

    /// Radians.
    pub fn set_rotation(&mut self, rotation: f64) {
        match self {
            Shape::Rectangle(s) => s.rotation = rotation,
            Shape::Path(s) => s.rotation = rotation,
            Shape::Text(s) => s.rotation = rotation,
            Shape::Group(s) => s.rotation = rotation,
            Shape::Image(s) => s.rotation = rotation,
        }
    }

    /// Rotation angle in degrees, as shown in the angle input.
    pub fn angle(&self) -> f64 {
        self.rotation().to_degrees()
    }

    /// Set the rotation angle from degrees.
    pub fn set_angle(&mut self, degrees: f64) {
        self.set_rotation(degrees.to_radians());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_output() {
        assert_eq!(SerializableColor::new(18, 52, 86, 255).to_hex(), "#123456");
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(12, 200, 34, 128);
        let paint: Color = color.into();
        assert_eq!(SerializableColor::from(paint), color);
    }

    #[test]
    fn test_capabilities() {
        let text = Shape::Text(Text::new(Point::ZERO, "Hi".to_string()));
        let image = Shape::Image(Image::new(Point::ZERO, &[0u8; 4], 2, 2));
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));

        assert!(text.as_fillable().is_some());
        assert!(text.as_textual().is_some());
        assert!(image.as_fillable().is_none());
        assert!(rect.as_textual().is_none());
    }

    #[test]
    fn test_regenerate_id_renumbers_children() {
        let rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        let child_id = rect.id();
        let mut group = Shape::Group(Group::new(vec![Shape::Rectangle(rect)]));
        let group_id = group.id();

        group.regenerate_id();

        assert_ne!(group.id(), group_id);
        let child = group.as_group().map(|g| g.children()[0].id());
        assert_ne!(child, Some(child_id));
    }

    #[test]
    fn test_angle_in_degrees() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        shape.set_angle(45.0);
        assert!((shape.angle() - 45.0).abs() < 1e-9);
        assert!((shape.rotation() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
