//! The scene graph: shapes in z-order plus persistent overlays.

use crate::overlay::{Overlay, OverlayKind};
use crate::shapes::{Group, SerializableColor, Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized exportable content of a scene at one point in time.
///
/// Snapshots compare by their serialized text, so two scenes with the same
/// shapes in the same order produce equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneSnapshot(String);

impl SceneSnapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Borrowed view used when writing a snapshot.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    shapes: Vec<&'a Shape>,
}

/// Owned form read back from a snapshot.
#[derive(Deserialize)]
struct SnapshotData {
    shapes: Vec<Shape>,
}

/// What lies under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Shape(ShapeId),
    Overlay(OverlayKind),
}

/// Ordered collection of shapes and the overlays drawn above them.
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Overlays, back to front. The border sits at the back.
    overlays: Vec<Overlay>,
    size: Size,
    background: Option<SerializableColor>,
    grid_spacing: f64,
}

impl Scene {
    /// Create an empty scene with the border and (hidden) grid overlays.
    pub fn new(size: Size, grid_spacing: f64) -> Self {
        let mut scene = Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            overlays: Vec::new(),
            size,
            background: None,
            grid_spacing,
        };
        scene.ensure_overlays();
        scene
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Canvas center in world coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    pub fn background(&self) -> Option<SerializableColor> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<SerializableColor>) {
        self.background = background;
    }

    /// Add a shape on top of the z-order.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape from the scene.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Shape ids in z-order (back to front).
    pub fn shape_ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Find shapes at a point, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// Topmost thing under a point: shapes first, then visible overlays.
    pub fn target_at(&self, point: Point, tolerance: f64) -> Option<HitTarget> {
        if let Some(&id) = self.shapes_at_point(point, tolerance).first() {
            return Some(HitTarget::Shape(id));
        }
        self.overlays
            .iter()
            .rev()
            .find(|overlay| overlay.hit_test(point, self.size, tolerance))
            .map(|overlay| HitTarget::Overlay(overlay.kind))
    }

    /// Group the given shapes into a single group.
    ///
    /// Children keep their relative z-order and the group takes the slot of
    /// the frontmost member. Returns `None` if fewer than two of the ids are
    /// in the scene.
    pub fn group_shapes(&mut self, shape_ids: &[ShapeId]) -> Option<ShapeId> {
        let members: Vec<(usize, ShapeId)> = self
            .z_order
            .iter()
            .enumerate()
            .filter(|(_, id)| shape_ids.contains(id))
            .map(|(idx, &id)| (idx, id))
            .collect();
        if members.len() < 2 {
            return None;
        }
        let (front_idx, _) = members[members.len() - 1];

        let mut children = Vec::with_capacity(members.len());
        for &(_, id) in &members {
            if let Some(shape) = self.remove_shape(id) {
                children.push(shape);
            }
        }

        let group = Group::new(children);
        let group_id = group.id;
        let insert_pos = (front_idx + 1 - members.len()).min(self.z_order.len());
        self.z_order.insert(insert_pos, group_id);
        self.shapes.insert(group_id, Shape::Group(group));
        Some(group_id)
    }

    /// Dissolve a group, putting its children where the group was.
    /// Returns the child ids, or `None` if `group_id` is not a group.
    pub fn ungroup_shape(&mut self, group_id: ShapeId) -> Option<Vec<ShapeId>> {
        if !self.shapes.get(&group_id).is_some_and(Shape::is_group) {
            return None;
        }
        let z_pos = self.z_order.iter().position(|&id| id == group_id)?;
        let Some(Shape::Group(group)) = self.remove_shape(group_id) else {
            return None;
        };

        let children = group.ungroup();
        let child_ids: Vec<ShapeId> = children.iter().map(Shape::id).collect();
        for (i, child) in children.into_iter().enumerate() {
            let child_id = child.id();
            self.shapes.insert(child_id, child);
            self.z_order.insert(z_pos + i, child_id);
        }
        Some(child_ids)
    }

    /// Serialize the exportable content. Overlays are not included.
    pub fn snapshot(&self) -> Result<SceneSnapshot, serde_json::Error> {
        let data = SnapshotRef {
            shapes: self.shapes_ordered().collect(),
        };
        serde_json::to_string(&data).map(SceneSnapshot)
    }

    /// Replace the content with a snapshot's.
    ///
    /// The scene is only touched once the snapshot has parsed, and missing
    /// overlays are re-inserted afterwards.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) -> Result<(), serde_json::Error> {
        let data: SnapshotData = serde_json::from_str(snapshot.as_str())?;
        self.shapes.clear();
        self.z_order.clear();
        for shape in data.shapes {
            self.add_shape(shape);
        }
        self.ensure_overlays();
        Ok(())
    }

    /// Overlays, back to front.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, kind: OverlayKind) -> Option<&Overlay> {
        self.overlays.iter().find(|overlay| overlay.kind == kind)
    }

    fn overlay_mut(&mut self, kind: OverlayKind) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|overlay| overlay.kind == kind)
    }

    /// Detach an overlay from the scene.
    pub fn remove_overlay(&mut self, kind: OverlayKind) -> Option<Overlay> {
        let idx = self.overlays.iter().position(|overlay| overlay.kind == kind)?;
        Some(self.overlays.remove(idx))
    }

    /// Re-insert the border (at the back) and the grid if either is absent.
    pub fn ensure_overlays(&mut self) {
        if self.overlay(OverlayKind::Border).is_none() {
            log::debug!("Re-inserting border overlay");
            self.overlays.insert(0, Overlay::border());
        }
        if self.overlay(OverlayKind::Grid).is_none() {
            self.overlays.push(Overlay::grid(self.grid_spacing));
        }
    }

    pub fn is_grid_visible(&self) -> bool {
        self.overlay(OverlayKind::Grid)
            .is_some_and(|overlay| overlay.visible)
    }

    /// Show or hide the grid. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        self.ensure_overlays();
        match self.overlay_mut(OverlayKind::Grid) {
            Some(grid) => {
                grid.visible = !grid.visible;
                grid.visible
            }
            None => false,
        }
    }

    /// Hide every overlay, returning the previous visibility of each.
    pub fn hide_overlays(&mut self) -> Vec<(OverlayKind, bool)> {
        self.overlays
            .iter_mut()
            .map(|overlay| {
                let was_visible = overlay.visible;
                overlay.visible = false;
                (overlay.kind, was_visible)
            })
            .collect()
    }

    /// Undo [`Scene::hide_overlays`].
    pub fn restore_overlay_visibility(&mut self, saved: &[(OverlayKind, bool)]) {
        for &(kind, visible) in saved {
            if let Some(overlay) = self.overlay_mut(kind) {
                overlay.visible = visible;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Text};

    fn scene() -> Scene {
        Scene::new(Size::new(800.0, 600.0), 20.0)
    }

    fn rect_at(x: f64, y: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), 50.0, 50.0))
    }

    #[test]
    fn test_new_scene_has_overlays() {
        let scene = scene();
        assert_eq!(scene.overlays()[0].kind, OverlayKind::Border);
        assert!(!scene.is_grid_visible());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_snapshot_excludes_overlays() {
        let mut scene = scene();
        scene.toggle_grid();
        let snapshot = scene.snapshot().unwrap();
        assert_eq!(snapshot.as_str(), r#"{"shapes":[]}"#);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let mut scene = scene();
        scene.add_shape(rect_at(0.0, 0.0));
        scene.add_shape(rect_at(100.0, 0.0));
        scene.add_shape(rect_at(200.0, 0.0));
        assert_eq!(scene.snapshot().unwrap(), scene.snapshot().unwrap());
    }

    #[test]
    fn test_restore_roundtrip() {
        let mut scene = scene();
        let a = scene.add_shape(rect_at(0.0, 0.0));
        let b = scene.add_shape(Shape::Text(Text::new(Point::ZERO, "hi".into())));
        let snapshot = scene.snapshot().unwrap();

        scene.remove_shape(a);
        scene.restore(&snapshot).unwrap();

        assert_eq!(scene.shape_ids(), &[a, b]);
        assert_eq!(scene.snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_restore_reinserts_missing_overlays() {
        let mut scene = scene();
        let snapshot = scene.snapshot().unwrap();
        scene.remove_overlay(OverlayKind::Border);
        scene.remove_overlay(OverlayKind::Grid);

        scene.restore(&snapshot).unwrap();

        assert_eq!(scene.overlays().len(), 2);
        assert_eq!(scene.overlays()[0].kind, OverlayKind::Border);
    }

    #[test]
    fn test_restore_keeps_grid_visibility() {
        let mut scene = scene();
        let snapshot = scene.snapshot().unwrap();
        scene.toggle_grid();
        scene.restore(&snapshot).unwrap();
        assert!(scene.is_grid_visible());
    }

    #[test]
    fn test_failed_restore_leaves_scene() {
        let mut scene = scene();
        let id = scene.add_shape(rect_at(0.0, 0.0));
        let bad = SceneSnapshot("not json".to_string());
        assert!(scene.restore(&bad).is_err());
        assert!(scene.contains(id));
    }

    #[test]
    fn test_target_at_prefers_shapes() {
        let mut scene = scene();
        let id = scene.add_shape(rect_at(0.0, 0.0));
        assert_eq!(
            scene.target_at(Point::new(1.0, 1.0), 2.0),
            Some(HitTarget::Shape(id))
        );
        assert_eq!(
            scene.target_at(Point::new(400.0, 0.5), 2.0),
            Some(HitTarget::Overlay(OverlayKind::Border))
        );
        assert_eq!(scene.target_at(Point::new(400.0, 300.0), 2.0), None);
    }

    #[test]
    fn test_group_keeps_frontmost_slot() {
        let mut scene = scene();
        let a = scene.add_shape(rect_at(0.0, 0.0));
        let b = scene.add_shape(rect_at(100.0, 0.0));
        let c = scene.add_shape(rect_at(200.0, 0.0));
        let d = scene.add_shape(rect_at(300.0, 0.0));

        let group_id = scene.group_shapes(&[c, a]).unwrap();

        assert_eq!(scene.shape_ids(), &[b, group_id, d]);
        let group = scene.get_shape(group_id).and_then(Shape::as_group).unwrap();
        let children: Vec<ShapeId> = group.children().iter().map(Shape::id).collect();
        assert_eq!(children, vec![a, c]);
    }

    #[test]
    fn test_group_needs_two_members() {
        let mut scene = scene();
        let a = scene.add_shape(rect_at(0.0, 0.0));
        assert_eq!(scene.group_shapes(&[a]), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ungroup_restores_members_in_place() {
        let mut scene = scene();
        let a = scene.add_shape(rect_at(0.0, 0.0));
        let b = scene.add_shape(rect_at(100.0, 0.0));
        let c = scene.add_shape(rect_at(200.0, 0.0));
        let group_id = scene.group_shapes(&[a, b]).unwrap();

        let children = scene.ungroup_shape(group_id).unwrap();

        assert_eq!(children, vec![a, b]);
        assert_eq!(scene.shape_ids(), &[a, b, c]);
        assert_eq!(scene.ungroup_shape(c), None);
    }

    #[test]
    fn test_hide_and_restore_overlays() {
        let mut scene = scene();
        scene.toggle_grid();
        let saved = scene.hide_overlays();
        assert!(scene.overlays().iter().all(|o| !o.visible));
        scene.restore_overlay_visibility(&saved);
        assert!(scene.is_grid_visible());
        assert!(scene.overlay(OverlayKind::Border).is_some_and(|o| o.visible));
    }
}
