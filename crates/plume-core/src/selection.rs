//! Active selection and in-place text editing state.

use crate::shapes::ShapeId;
use std::collections::HashSet;

/// The active selection.
///
/// A multi-selection is a transient composite: it has no id of its own and
/// is always handled through its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Single(ShapeId),
    Multi(Vec<ShapeId>),
}

impl Selection {
    /// Build a selection from ids, collapsing to `None`/`Single` as needed.
    /// Repeated ids keep their first position.
    pub fn from_ids(mut ids: Vec<ShapeId>) -> Self {
        let mut seen = HashSet::with_capacity(ids.len());
        ids.retain(|id| seen.insert(*id));
        match ids.len() {
            0 => Selection::None,
            1 => Selection::Single(ids[0]),
            _ => Selection::Multi(ids),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Whether this is a composite of several shapes.
    pub fn is_composite(&self) -> bool {
        matches!(self, Selection::Multi(_))
    }

    /// The selected shape when exactly one is selected.
    pub fn single(&self) -> Option<ShapeId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> Vec<ShapeId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multi(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(selected) => *selected == id,
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Multi(ids) => ids.len(),
        }
    }

    /// Drop ids that no longer satisfy `keep`.
    pub fn retain(&mut self, keep: impl Fn(ShapeId) -> bool) {
        let ids = self.ids().into_iter().filter(|&id| keep(id)).collect();
        *self = Selection::from_ids(ids);
    }
}

/// Selection plus the text object being edited in place, if any.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selection: Selection,
    /// Text shape with keyboard focus.
    editing: Option<ShapeId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select a single shape (clears other selections).
    pub fn select(&mut self, id: ShapeId) {
        self.set(Selection::Single(id));
    }

    /// Select several shapes as one composite.
    pub fn select_many(&mut self, ids: Vec<ShapeId>) {
        self.set(Selection::from_ids(ids));
    }

    /// Replace the selection, leaving edit mode if the edited shape drops out.
    pub fn set(&mut self, selection: Selection) {
        if let Some(editing) = self.editing {
            if !selection.contains(editing) {
                self.editing = None;
            }
        }
        self.selection = selection;
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
        self.editing = None;
    }

    /// Enter editing mode for a text shape; it becomes the selection.
    pub fn enter_editing(&mut self, id: ShapeId) {
        self.selection = Selection::Single(id);
        self.editing = Some(id);
    }

    /// Leave editing mode, returning the shape that was being edited.
    pub fn exit_editing(&mut self) -> Option<ShapeId> {
        self.editing.take()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<ShapeId> {
        self.editing
    }

    /// Forget a shape that left the scene.
    pub fn remove(&mut self, id: ShapeId) {
        self.selection.retain(|selected| selected != id);
        if self.editing == Some(id) {
            self.editing = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_from_ids_collapses() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(Selection::from_ids(vec![]), Selection::None);
        assert_eq!(Selection::from_ids(vec![a]), Selection::Single(a));
        assert!(Selection::from_ids(vec![a, b]).is_composite());
    }

    #[test]
    fn test_scattered_duplicates_removed() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(Selection::from_ids(vec![a, b, a]), Selection::Multi(vec![a, b]));
        assert_eq!(Selection::from_ids(vec![a, b, a, b]).ids(), vec![a, b]);
        assert_eq!(Selection::from_ids(vec![b, a, a, b]).ids(), vec![b, a]);
        assert_eq!(Selection::from_ids(vec![a, a]), Selection::Single(a));
    }

    #[test]
    fn test_retain_shrinks_composite() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut selection = Selection::Multi(vec![a, b]);
        selection.retain(|id| id != b);
        assert_eq!(selection, Selection::Single(a));
    }

    #[test]
    fn test_editing_follows_selection() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut state = SelectionState::new();
        state.enter_editing(a);
        assert!(state.is_editing());
        assert_eq!(state.selection().single(), Some(a));

        state.select(b);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_remove_clears_editing() {
        let a = Uuid::new_v4();
        let mut state = SelectionState::new();
        state.enter_editing(a);
        state.remove(a);
        assert!(state.selection().is_empty());
        assert_eq!(state.editing(), None);
    }
}
