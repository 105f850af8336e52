//! Text shape.

use super::{Fillable, SerializableColor, ShapeId, ShapeStyle, ShapeTrait, Textual};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options offered by the font picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Browser default serif face.
    #[default]
    TimesNewRoman,
    Arial,
    Georgia,
    Verdana,
    CourierNew,
}

impl FontFamily {
    /// Get the font family name as written to CSS/SVG.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Arial => "Arial",
            FontFamily::Georgia => "Georgia",
            FontFamily::Verdana => "Verdana",
            FontFamily::CourierNew => "Courier New",
        }
    }

    /// Families offered by the font picker.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::TimesNewRoman,
            FontFamily::Arial,
            FontFamily::Georgia,
            FontFamily::Verdana,
            FontFamily::CourierNew,
        ]
    }

    /// Look up a family by its CSS name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_matches(|c| c == '\'' || c == '"');
        Self::all()
            .iter()
            .copied()
            .find(|family| family.name().eq_ignore_ascii_case(name))
    }
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS keyword.
    pub fn css(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// CSS keyword.
    pub fn css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// An editable text shape. The fill color is the glyph color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left of the first line box.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family.
    #[serde(default)]
    pub font_family: FontFamily,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font style.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Radians, about the centre.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size for imported text without an explicit size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.16;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            rotation: 0.0,
            style: ShapeStyle::filled(SerializableColor::black()),
        }
    }

    /// Create a text whose bounding box is centered on `center`.
    pub fn centered_at(center: Point, content: String, font_size: f64) -> Self {
        let mut text = Self::new(center, content).with_font_size(font_size);
        let bounds = text.bounds();
        text.position = Point::new(
            center.x - bounds.width() / 2.0,
            center.y - bounds.height() / 2.0,
        );
        text
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the glyph color.
    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.style.fill_color = Some(color);
        self
    }

    /// Lines of the content. Empty text still has one (empty) line.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }

    /// Estimate from the longest line; no font metrics are available here.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        // Empirical average advance per face
        let char_width_factor = match (self.font_family, self.font_weight) {
            (FontFamily::CourierNew, _) => 0.60,
            (FontFamily::Verdana, FontWeight::Normal) => 0.58,
            (FontFamily::Verdana, FontWeight::Bold) => 0.64,
            (_, FontWeight::Normal) => 0.50,
            (_, FontWeight::Bold) => 0.55,
        };

        max_line_len as f64 * self.font_size * char_width_factor
    }

    /// Line count times the line box.
    fn approximate_height(&self) -> f64 {
        self.lines().len() as f64 * self.font_size * Self::LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let width = self.approximate_width().max(self.font_size / 2.0);
        let height = self.approximate_height();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.bounds().inflate(tolerance, tolerance);
        bounds.contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Selection outline only; glyphs are laid out by the renderer
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Only a noticeable scale resizes the font.
        let coeffs = affine.as_coeffs();
        let scale = (coeffs[0].abs() + coeffs[3].abs()) / 2.0;
        if (scale - 1.0).abs() > 0.01 {
            self.font_size *= scale;
        }
    }
}

impl Fillable for Text {
    fn fill_color(&self) -> Option<SerializableColor> {
        self.style.fill_color
    }

    fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        self.style.fill_color = color;
    }
}

impl Textual for Text {
    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn font_family(&self) -> FontFamily {
        self.font_family
    }

    fn set_font_family(&mut self, family: FontFamily) {
        self.font_family = family;
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    fn set_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    fn font_style(&self) -> FontStyle {
        self.font_style
    }

    fn set_font_style(&mut self, style: FontStyle) {
        self.font_style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello".to_string());
        assert_eq!(text.content(), "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(text.style.fill_color, Some(SerializableColor::black()));
    }

    #[test]
    fn test_centered_at() {
        let center = Point::new(400.0, 300.0);
        let text = Text::centered_at(center, "New Text".to_string(), 24.0);
        let bounds = text.bounds();
        assert!((bounds.center().x - center.x).abs() < 1e-9);
        assert!((bounds.center().y - center.y).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello World".to_string());
        let center = text.bounds().center();
        assert!(text.hit_test(center, 0.0));
        assert!(!text.hit_test(Point::new(0.0, 0.0), 0.0));
    }

    #[test]
    fn test_multiline_bounds_grow() {
        let one = Text::new(Point::ZERO, "a".to_string());
        let two = Text::new(Point::ZERO, "a\nb".to_string());
        assert!(two.bounds().height() > one.bounds().height());
    }

    #[test]
    fn test_font_family_lookup() {
        assert_eq!(FontFamily::from_name("arial"), Some(FontFamily::Arial));
        assert_eq!(
            FontFamily::from_name("'Courier New'"),
            Some(FontFamily::CourierNew)
        );
        assert_eq!(FontFamily::from_name("Comic Sans"), None);
    }
}
