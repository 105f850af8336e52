//! Axis-aligned boxes.

use super::{Fillable, SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PATH_TOLERANCE: f64 = 0.1;

/// A box anchored at its top-left corner. Rotation is applied around the
/// centre at render time and does not affect `position` or the size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub corner_radius: f64,
    /// Radians.
    #[serde(default)]
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let body = self.as_rect();
        if self.style.fill_color.is_some() {
            return body.inflate(tolerance, tolerance).contains(point);
        }
        // Unfilled boxes are only grabbable by their outline.
        let band = tolerance + self.style.stroke_width * 0.5;
        body.inflate(band, band).contains(point) && !body.inflate(-band, -band).contains(point)
    }

    fn to_path(&self) -> BezPath {
        match self.corner_radius {
            r if r > 0.0 => RoundedRect::from_rect(self.as_rect(), r).to_path(PATH_TOLERANCE),
            _ => self.as_rect().to_path(PATH_TOLERANCE),
        }
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

impl Fillable for Rectangle {
    fn fill_color(&self) -> Option<SerializableColor> {
        self.style.fill_color
    }

    fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        self.style.fill_color = color;
    }
}
