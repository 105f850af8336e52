//! Single-slot clipboard for copy, cut and paste of shapes.

use crate::shapes::Shape;
use kurbo::Vec2;

/// Default paste offset in pixels on both axes.
pub const PASTE_OFFSET: f64 = 10.0;

/// What the clipboard holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipContent {
    /// One shape (possibly a group).
    Single(Shape),
    /// Members of a multi-selection, back to front.
    Multi(Vec<Shape>),
}

impl ClipContent {
    fn shapes_mut(&mut self) -> &mut [Shape] {
        match self {
            ClipContent::Single(shape) => std::slice::from_mut(shape),
            ClipContent::Multi(shapes) => shapes,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        match self {
            ClipContent::Single(shape) => std::slice::from_ref(shape),
            ClipContent::Multi(shapes) => shapes,
        }
    }

    /// Consume into the contained shapes.
    pub fn into_shapes(self) -> Vec<Shape> {
        match self {
            ClipContent::Single(shape) => vec![shape],
            ClipContent::Multi(shapes) => shapes,
        }
    }
}

/// How the current entry got into the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    Copy,
    /// The source left the scene; the entry is consumed by one paste.
    Cut,
}

#[derive(Debug, Clone)]
struct ClipEntry {
    content: ClipContent,
    kind: ClipKind,
    /// Pastes served from this entry so far.
    pastes: u32,
}

/// Holds at most one copied or cut object.
#[derive(Debug, Clone)]
pub struct Clipboard {
    slot: Option<ClipEntry>,
    offset: f64,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new(PASTE_OFFSET)
    }
}

impl Clipboard {
    /// Create an empty clipboard that staggers pastes by `offset` pixels.
    pub fn new(offset: f64) -> Self {
        Self { slot: None, offset }
    }

    /// Store a copy, replacing any previous entry.
    pub fn copy(&mut self, content: ClipContent) {
        self.store(content, ClipKind::Copy);
    }

    /// Store a cut, replacing any previous entry.
    pub fn cut(&mut self, content: ClipContent) {
        self.store(content, ClipKind::Cut);
    }

    fn store(&mut self, content: ClipContent, kind: ClipKind) {
        self.slot = Some(ClipEntry {
            content,
            kind,
            pastes: 0,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn kind(&self) -> Option<ClipKind> {
        self.slot.as_ref().map(|entry| entry.kind)
    }

    /// Peek at the held content.
    pub fn content(&self) -> Option<&ClipContent> {
        self.slot.as_ref().map(|entry| &entry.content)
    }

    /// Offset the next paste will be placed at.
    pub fn next_offset(&self) -> Option<Vec2> {
        self.slot.as_ref().map(|entry| {
            let step = self.offset * (entry.pastes + 1) as f64;
            Vec2::new(step, step)
        })
    }

    /// Produce a fresh clone of the held content, moved by the next offset
    /// and carrying new ids. Returns `None` if the clipboard is empty.
    pub fn paste(&mut self) -> Option<ClipContent> {
        let delta = self.next_offset()?;
        let entry = self.slot.as_mut()?;

        let mut content = entry.content.clone();
        for shape in content.shapes_mut() {
            shape.regenerate_id();
            shape.translate(delta);
        }
        entry.pastes += 1;

        if entry.kind == ClipKind::Cut {
            self.slot = None;
        }
        Some(content)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use kurbo::Point;

    fn rect() -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(100.0, 100.0), 50.0, 50.0))
    }

    fn origin(content: &ClipContent) -> Point {
        content.shapes()[0].bounds().origin()
    }

    #[test]
    fn test_empty_paste() {
        let mut clipboard = Clipboard::default();
        assert!(clipboard.paste().is_none());
    }

    #[test]
    fn test_copy_pastes_stagger() {
        let source = rect();
        let mut clipboard = Clipboard::default();
        clipboard.copy(ClipContent::Single(source.clone()));

        let first = clipboard.paste().unwrap();
        let second = clipboard.paste().unwrap();

        assert_eq!(origin(&first), Point::new(110.0, 110.0));
        assert_eq!(origin(&second), Point::new(120.0, 120.0));
        assert_ne!(first.shapes()[0].id(), source.id());
        assert_ne!(first.shapes()[0].id(), second.shapes()[0].id());
        // Held copy is untouched
        assert_eq!(clipboard.content(), Some(&ClipContent::Single(source)));
    }

    #[test]
    fn test_cut_pastes_once() {
        let mut clipboard = Clipboard::default();
        clipboard.cut(ClipContent::Single(rect()));

        let pasted = clipboard.paste().unwrap();
        assert_eq!(origin(&pasted), Point::new(110.0, 110.0));
        assert!(clipboard.paste().is_none());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_new_copy_resets_offset() {
        let mut clipboard = Clipboard::default();
        clipboard.copy(ClipContent::Single(rect()));
        clipboard.paste();
        clipboard.copy(ClipContent::Single(rect()));
        assert_eq!(clipboard.next_offset(), Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_multi_content_keeps_members() {
        let mut clipboard = Clipboard::new(5.0);
        clipboard.copy(ClipContent::Multi(vec![rect(), rect()]));
        let pasted = clipboard.paste().unwrap();
        assert_eq!(pasted.shapes().len(), 2);
        assert_eq!(origin(&pasted), Point::new(105.0, 105.0));
    }
}
