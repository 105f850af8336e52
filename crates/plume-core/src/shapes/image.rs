//! Embedded PNG images.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A PNG image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub position: Point,
    /// Size on the canvas.
    pub width: f64,
    pub height: f64,
    /// Pixel dimensions of the encoded image.
    pub source_width: u32,
    pub source_height: u32,
    /// Encoded PNG bytes, base64 so snapshots stay plain JSON.
    pub data_base64: String,
    /// Radians, about the centre.
    #[serde(default)]
    pub rotation: f64,
    /// Only the stroke is drawn, as a border.
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image shape at natural size from encoded PNG bytes.
    pub fn new(position: Point, data: &[u8], source_width: u32, source_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            data_base64: STANDARD.encode(data),
            rotation: 0.0,
            style: ShapeStyle {
                fill_color: None,
                ..ShapeStyle::default()
            },
        }
    }

    /// Create an image at natural size whose center sits on `center`.
    pub fn centered_at(center: Point, data: &[u8], source_width: u32, source_height: u32) -> Self {
        let position = Point::new(
            center.x - source_width as f64 / 2.0,
            center.y - source_height as f64 / 2.0,
        );
        Self::new(position, data, source_width, source_height)
    }

    /// Encoded PNG bytes, or `None` if the stored base64 is corrupt.
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// `data:` URI suitable for an SVG `<image>` element.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.data_base64)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        let [sx, _, _, sy, _, _] = affine.as_coeffs();
        self.position = affine * self.position;
        self.width *= sx.abs();
        self.height *= sy.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_at_natural_size() {
        let data = vec![0u8; 10];
        let img = Image::centered_at(Point::new(400.0, 300.0), &data, 100, 50);
        assert!((img.width - 100.0).abs() < f64::EPSILON);
        assert!((img.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(img.bounds().center(), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_data_roundtrip() {
        let data = vec![1u8, 2, 3, 4];
        let img = Image::new(Point::ZERO, &data, 1, 1);
        assert_eq!(img.data(), Some(data));
        assert!(img.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_hit_anywhere_inside() {
        let img = Image::new(Point::new(10.0, 20.0), &[0u8; 4], 100, 50);
        assert_eq!(img.bounds(), Rect::new(10.0, 20.0, 110.0, 70.0));
        assert!(img.hit_test(Point::new(60.0, 45.0), 0.0));
        assert!(!img.hit_test(Point::new(5.0, 45.0), 0.0));
    }

    #[test]
    fn test_corrupt_data() {
        let mut img = Image::new(Point::ZERO, &[1u8, 2], 1, 1);
        img.data_base64 = "not base64!".to_string();
        assert_eq!(img.data(), None);
    }
}
