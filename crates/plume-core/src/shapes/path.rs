//! Free-form vector path, produced mostly by SVG import.

use super::{Fillable, SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accuracy used when measuring the distance to curved segments.
const NEAREST_ACCURACY: f64 = 0.1;

/// An arbitrary Bézier path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: ShapeId,
    /// Geometry in world coordinates.
    pub path: BezPath,
    /// Rotation angle in radians (around the bounds center).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Path {
    /// Create a new path shape.
    pub fn new(path: BezPath, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            rotation: 0.0,
            style,
        }
    }

    /// Distance from a point to the nearest segment of the outline.
    fn outline_distance(&self, point: Point) -> f64 {
        self.path
            .segments()
            .map(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

impl ShapeTrait for Path {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.path.bounding_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.style.fill_color.is_some() && self.path.contains(point) {
            return true;
        }
        self.outline_distance(point) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        self.path.clone()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.path.apply_affine(affine);
    }
}

impl Fillable for Path {
    fn fill_color(&self) -> Option<SerializableColor> {
        self.style.fill_color
    }

    fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        self.style.fill_color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path.line_to((0.0, 100.0));
        path.close_path();
        path
    }

    #[test]
    fn test_bounds() {
        let shape = Path::new(triangle(), ShapeStyle::default());
        let bounds = shape.bounds();
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filled_hit_test() {
        let shape = Path::new(triangle(), ShapeStyle::default());
        assert!(shape.hit_test(Point::new(10.0, 10.0), 0.0));
        assert!(!shape.hit_test(Point::new(90.0, 90.0), 0.0));
    }

    #[test]
    fn test_outline_hit_test() {
        let shape = Path::new(triangle(), ShapeStyle::outlined(SerializableColor::black(), 2.0));
        assert!(shape.hit_test(Point::new(50.0, 0.5), 1.0));
        assert!(!shape.hit_test(Point::new(10.0, 10.0), 1.0));
    }

    #[test]
    fn test_transform_moves_geometry() {
        let mut shape = Path::new(triangle(), ShapeStyle::default());
        shape.transform(Affine::translate((10.0, 5.0)));
        let bounds = shape.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 5.0).abs() < f64::EPSILON);
    }
}
