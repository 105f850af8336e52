//! Nested groups.

use super::{Shape, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persistent grouping of shapes, manipulated as a single unit.
///
/// Children keep their own geometry in world coordinates; the group only
/// forwards hit-testing and transforms. Groups may nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes, back to front.
    pub children: Vec<Shape>,
    /// Rotation angle in radians (around the bounds center).
    #[serde(default)]
    pub rotation: f64,
    /// Unused for painting; opacity applies to the whole group.
    #[serde(default)]
    style: ShapeStyle,
}

impl Group {
    /// Create a new group from shapes ordered back to front.
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            children,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Consume the group, keeping the children in stacking order.
    pub fn ungroup(self) -> Vec<Shape> {
        self.children
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.children
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
            .unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.children
            .iter()
            .any(|child| child.hit_test(point, tolerance))
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            path.extend(child.to_path());
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for child in &mut self.children {
            child.transform(affine);
        }
    }
}
