//! The editing session: turns commands and input into scene mutations and
//! history checkpoints.

use crate::camera::Camera;
use crate::clipboard::{ClipContent, Clipboard};
use crate::command::EditorCommand;
use crate::config::EditorConfig;
use crate::history::{HistoryManager, HistoryResult};
use crate::input::{InputState, Key, Modifiers, MouseButton, PointerEvent, resolve_shortcut};
use crate::prompt::UserPrompt;
use crate::scene::{HitTarget, Scene};
use crate::selection::{Selection, SelectionState};
use crate::shapes::{
    FontFamily, FontStyle, FontWeight, Group, Image, SerializableColor, Shape, ShapeId, Text,
    Textual,
};
use kurbo::{Point, Vec2};

/// Text placed by "add text" and empty-canvas right clicks.
pub const NEW_TEXT_CONTENT: &str = "New Text";

/// Question asked before a right click deletes an object.
pub const DELETE_CONFIRMATION: &str = "Delete this object?";

/// Decoded import, ready to be applied to a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedContent {
    /// Primitives parsed from a vector file, back to front.
    Shapes(Vec<Shape>),
    /// An encoded PNG and its natural size.
    Image {
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
}

/// Outcome of a right click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    AddedText(ShapeId),
    Grouped(ShapeId),
    Ungrouped(Vec<ShapeId>),
    Deleted(ShapeId),
    /// The user declined the delete confirmation.
    Declined,
    /// Clicked an overlay.
    Ignored,
}

/// Owns the scene and everything that edits it.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    scene: Scene,
    history: HistoryManager,
    clipboard: Clipboard,
    selection: SelectionState,
    camera: Camera,
    input: InputState,
}

impl EditorSession {
    /// Create a session with an empty scene and record the initial state.
    pub fn new(config: EditorConfig) -> HistoryResult<Self> {
        let mut scene = Scene::new(config.canvas_size(), config.grid_spacing);
        scene.set_background(config.background);
        let mut history = HistoryManager::new(config.history_limit);
        history.checkpoint(&scene)?;

        log::info!(
            "Editor session started ({}x{} canvas)",
            config.canvas_width,
            config.canvas_height
        );
        Ok(Self {
            clipboard: Clipboard::new(config.paste_offset),
            camera: Camera::with_bounds(config.min_zoom, config.max_zoom),
            config,
            scene,
            history,
            selection: SelectionState::new(),
            input: InputState::new(),
        })
    }

    /// End the session, keeping the scene.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    /// The text shape being edited in place, if any.
    pub fn editing_text(&self) -> Option<ShapeId> {
        self.selection.editing()
    }

    pub fn is_editing_text(&self) -> bool {
        self.selection.is_editing()
    }

    /// Record the current state. Called when an interactive edit is
    /// committed (blur, change or object-modified).
    pub fn commit_edit(&mut self) -> HistoryResult<bool> {
        self.history.checkpoint(&self.scene)
    }

    // --- Selection ---

    /// Select one shape. Ids not in the scene are ignored.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.selection.select(id);
        true
    }

    /// Select several shapes as a composite.
    pub fn select_many(&mut self, ids: &[ShapeId]) {
        let ids = ids
            .iter()
            .copied()
            .filter(|&id| self.scene.contains(id))
            .collect();
        self.selection.select_many(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected shapes that still exist, in z-order.
    fn selected_in_z_order(&self) -> Vec<ShapeId> {
        let selection = self.selection.selection();
        self.scene
            .shape_ids()
            .iter()
            .copied()
            .filter(|&id| selection.contains(id))
            .collect()
    }

    // --- Adding ---

    /// Insert a shape, select it and checkpoint.
    pub fn add_shape(&mut self, shape: Shape) -> HistoryResult<ShapeId> {
        let id = self.scene.add_shape(shape);
        self.selection.select(id);
        self.history.checkpoint(&self.scene)?;
        Ok(id)
    }

    /// Add "New Text" centred on the canvas.
    pub fn add_text(&mut self) -> HistoryResult<ShapeId> {
        self.add_text_at(self.scene.center())
    }

    /// Add "New Text" centred on a world point.
    pub fn add_text_at(&mut self, point: Point) -> HistoryResult<ShapeId> {
        let text = Text::centered_at(
            point,
            NEW_TEXT_CONTENT.to_string(),
            self.config.default_font_size,
        );
        self.add_shape(Shape::Text(text))
    }

    /// Apply decoded import content.
    ///
    /// One primitive is added as-is, several are grouped into one shape, and
    /// an image is centred on the canvas at natural size. Returns the id of
    /// the added shape, or `None` if there was nothing to add.
    pub fn apply_import(&mut self, content: ImportedContent) -> HistoryResult<Option<ShapeId>> {
        let shape = match content {
            ImportedContent::Shapes(mut shapes) => match shapes.len() {
                0 => {
                    log::info!("Import produced no shapes");
                    return Ok(None);
                }
                1 => shapes.remove(0),
                _ => Shape::Group(Group::new(shapes)),
            },
            ImportedContent::Image {
                data,
                width,
                height,
            } => Shape::Image(Image::centered_at(self.scene.center(), &data, width, height)),
        };
        log::info!("Imported shape {}", shape.id());
        self.add_shape(shape).map(Some)
    }

    // --- Removing ---

    /// Remove every selected shape. Skipped while a text edit is active.
    pub fn delete_selection(&mut self) -> HistoryResult<bool> {
        if self.selection.is_editing() {
            log::debug!("Delete ignored while editing text");
            return Ok(false);
        }
        let ids = self.selection.selection().ids();
        let mut removed = false;
        for id in ids {
            removed |= self.scene.remove_shape(id).is_some();
        }
        self.selection.clear();
        if removed {
            self.history.checkpoint(&self.scene)?;
        }
        Ok(removed)
    }

    // --- Grouping ---

    /// Turn a multi-selection into one group, which becomes the selection.
    pub fn group_selection(&mut self) -> HistoryResult<Option<ShapeId>> {
        if !self.selection.selection().is_composite() {
            return Ok(None);
        }
        let ids = self.selected_in_z_order();
        let Some(group_id) = self.scene.group_shapes(&ids) else {
            return Ok(None);
        };
        self.selection.select(group_id);
        self.history.checkpoint(&self.scene)?;
        Ok(Some(group_id))
    }

    /// Dissolve a group; its children become the selection.
    pub fn ungroup(&mut self, group_id: ShapeId) -> HistoryResult<Option<Vec<ShapeId>>> {
        let Some(children) = self.scene.ungroup_shape(group_id) else {
            return Ok(None);
        };
        self.selection.select_many(children.clone());
        self.history.checkpoint(&self.scene)?;
        Ok(Some(children))
    }

    /// Dissolve the selected group.
    pub fn ungroup_selection(&mut self) -> HistoryResult<Option<Vec<ShapeId>>> {
        match self.selection.selection().single() {
            Some(id) => self.ungroup(id),
            None => Ok(None),
        }
    }

    // --- Style and transform edits ---

    /// Run `edit` on every selected shape; returns whether any changed.
    fn edit_selection(&mut self, mut edit: impl FnMut(&mut Shape) -> bool) -> bool {
        let mut changed = false;
        for id in self.selection.selection().ids() {
            if let Some(shape) = self.scene.get_shape_mut(id) {
                changed |= edit(shape);
            }
        }
        changed
    }

    /// Checkpoint only if something changed.
    fn commit_if(&mut self, changed: bool) -> HistoryResult<bool> {
        if changed {
            self.history.checkpoint(&self.scene)?;
        }
        Ok(changed)
    }

    /// Set the fill color without recording history (live color input).
    pub fn preview_fill(&mut self, color: SerializableColor) -> bool {
        self.edit_selection(|shape| match shape.as_fillable_mut() {
            Some(fillable) => {
                fillable.set_fill_color(Some(color));
                true
            }
            None => false,
        })
    }

    /// Set the fill color of every fillable selected shape and checkpoint.
    pub fn set_fill(&mut self, color: SerializableColor) -> HistoryResult<bool> {
        let changed = self.preview_fill(color);
        self.commit_if(changed)
    }

    /// Set the rotation angle in degrees and checkpoint.
    pub fn set_angle(&mut self, degrees: f64) -> HistoryResult<bool> {
        let changed = self.edit_selection(|shape| {
            shape.set_angle(degrees);
            true
        });
        self.commit_if(changed)
    }

    /// Set the angle from raw input; anything unparseable counts as 0.
    pub fn set_angle_input(&mut self, input: &str) -> HistoryResult<bool> {
        self.set_angle(parse_number(input).unwrap_or(0.0))
    }

    fn edit_text(
        &mut self,
        mut edit: impl FnMut(&mut dyn Textual),
    ) -> HistoryResult<bool> {
        let changed = self.edit_selection(|shape| match shape.as_textual_mut() {
            Some(textual) => {
                edit(textual);
                true
            }
            None => false,
        });
        self.commit_if(changed)
    }

    pub fn set_font_family(&mut self, family: FontFamily) -> HistoryResult<bool> {
        self.edit_text(|text| text.set_font_family(family))
    }

    pub fn set_font_size(&mut self, size: f64) -> HistoryResult<bool> {
        self.edit_text(|text| text.set_font_size(size))
    }

    /// Set the font size from raw input; anything unparseable or
    /// non-positive falls back to the default size.
    pub fn set_font_size_input(&mut self, input: &str) -> HistoryResult<bool> {
        let size = parse_number(input)
            .filter(|size| *size > 0.0)
            .unwrap_or(self.config.default_font_size);
        self.set_font_size(size)
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) -> HistoryResult<bool> {
        self.edit_text(|text| text.set_font_weight(weight))
    }

    pub fn set_font_style(&mut self, style: FontStyle) -> HistoryResult<bool> {
        self.edit_text(|text| text.set_font_style(style))
    }

    /// Move the selection without recording history (dragging).
    pub fn move_selection(&mut self, delta: Vec2) -> bool {
        self.edit_selection(|shape| {
            shape.translate(delta);
            true
        })
    }

    // --- Text editing ---

    /// Start editing a text shape in place.
    pub fn begin_text_edit(&mut self, id: ShapeId) -> bool {
        let is_text = self
            .scene
            .get_shape(id)
            .is_some_and(|shape| shape.as_textual().is_some());
        if is_text {
            self.selection.enter_editing(id);
        }
        is_text
    }

    /// Replace the content of the text being edited.
    pub fn set_text_content(&mut self, content: &str) -> bool {
        let Some(id) = self.selection.editing() else {
            return false;
        };
        match self.scene.get_shape_mut(id).and_then(Shape::as_textual_mut) {
            Some(text) => {
                text.set_content(content.to_string());
                true
            }
            None => false,
        }
    }

    /// Finish editing and checkpoint the result.
    pub fn end_text_edit(&mut self) -> HistoryResult<bool> {
        if self.selection.exit_editing().is_none() {
            return Ok(false);
        }
        self.history.checkpoint(&self.scene)
    }

    // --- Clipboard ---

    /// Clones of the selected shapes. A composite stays a list of members.
    fn selection_content(&self) -> Option<ClipContent> {
        let mut shapes: Vec<Shape> = self
            .selected_in_z_order()
            .iter()
            .filter_map(|&id| self.scene.get_shape(id).cloned())
            .collect();
        match shapes.len() {
            0 => None,
            1 if !self.selection.selection().is_composite() => {
                Some(ClipContent::Single(shapes.remove(0)))
            }
            _ => Some(ClipContent::Multi(shapes)),
        }
    }

    /// Copy the selection into the clipboard without touching the scene.
    pub fn copy(&mut self) -> bool {
        match self.selection_content() {
            Some(content) => {
                self.clipboard.copy(content);
                true
            }
            None => false,
        }
    }

    /// Copy the selection, then delete it. Skipped while editing text.
    pub fn cut(&mut self) -> HistoryResult<bool> {
        if self.selection.is_editing() {
            return Ok(false);
        }
        let Some(content) = self.selection_content() else {
            return Ok(false);
        };
        self.clipboard.cut(content);
        self.delete_selection()
    }

    /// Paste a fresh, offset clone of the clipboard and select it.
    pub fn paste(&mut self) -> HistoryResult<bool> {
        let Some(content) = self.clipboard.paste() else {
            return Ok(false);
        };
        match content {
            ClipContent::Single(shape) => {
                let id = self.scene.add_shape(shape);
                self.selection.select(id);
            }
            ClipContent::Multi(shapes) => {
                let ids = shapes
                    .into_iter()
                    .map(|shape| self.scene.add_shape(shape))
                    .collect();
                self.selection.select_many(ids);
            }
        }
        self.history.checkpoint(&self.scene)?;
        Ok(true)
    }

    // --- History ---

    pub fn undo(&mut self) -> HistoryResult<bool> {
        let undone = self.history.undo(&mut self.scene)?;
        if undone {
            self.selection.clear();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> HistoryResult<bool> {
        let redone = self.history.redo(&mut self.scene)?;
        if redone {
            self.selection.clear();
        }
        Ok(redone)
    }

    // --- Overlays and viewport ---

    /// Show or hide the grid. Not an edit, so no checkpoint.
    pub fn toggle_grid(&mut self) -> bool {
        let visible = self.scene.toggle_grid();
        log::debug!("Grid {}", if visible { "shown" } else { "hidden" });
        visible
    }

    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.camera.zoom_at(screen_point, factor);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Run `f` with overlays hidden and the viewport at identity, restoring
    /// both afterwards.
    pub fn with_export_view<R>(&mut self, f: impl FnOnce(&Scene, &Camera) -> R) -> R {
        let saved_overlays = self.scene.hide_overlays();
        let saved_camera = self.camera.clone();
        self.camera.reset();

        let result = f(&self.scene, &self.camera);

        self.camera = saved_camera;
        self.scene.restore_overlay_visibility(&saved_overlays);
        result
    }

    // --- Input ---

    fn hit_tolerance(&self) -> f64 {
        self.config.hit_tolerance / self.camera.zoom
    }

    /// Right click at a screen position.
    pub fn context_click(
        &mut self,
        screen_point: Point,
        prompt: &dyn UserPrompt,
    ) -> HistoryResult<ContextAction> {
        let world = self.camera.screen_to_world(screen_point);
        let target = self.scene.target_at(world, self.hit_tolerance());

        let id = match target {
            None => return self.add_text_at(world).map(ContextAction::AddedText),
            Some(HitTarget::Overlay(_)) => return Ok(ContextAction::Ignored),
            Some(HitTarget::Shape(id)) => id,
        };

        if self.selection.selection().is_composite() {
            if let Some(group_id) = self.group_selection()? {
                return Ok(ContextAction::Grouped(group_id));
            }
        }

        if self.scene.get_shape(id).is_some_and(Shape::is_group) {
            if let Some(children) = self.ungroup(id)? {
                return Ok(ContextAction::Ungrouped(children));
            }
        }

        if !prompt.confirm(DELETE_CONFIRMATION) {
            return Ok(ContextAction::Declined);
        }
        self.scene.remove_shape(id);
        self.selection.remove(id);
        self.history.checkpoint(&self.scene)?;
        Ok(ContextAction::Deleted(id))
    }

    /// Left click: select the shape under the pointer, extending a
    /// selection with Shift. Clicking away ends any text edit.
    fn click(&mut self, screen_point: Point, modifiers: Modifiers) -> HistoryResult<()> {
        let world = self.camera.screen_to_world(screen_point);
        let target = self.scene.target_at(world, self.hit_tolerance());

        if let Some(editing) = self.selection.editing() {
            if target != Some(HitTarget::Shape(editing)) {
                self.end_text_edit()?;
            }
        }

        match target {
            Some(HitTarget::Shape(id)) if modifiers.shift => {
                let mut ids = self.selection.selection().ids();
                if !ids.contains(&id) {
                    ids.push(id);
                }
                self.selection.select_many(ids);
            }
            Some(HitTarget::Shape(id)) => {
                if !self.selection.selection().contains(id) {
                    self.selection.select(id);
                }
            }
            _ => self.selection.clear(),
        }
        Ok(())
    }

    /// Feed a pointer event.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        prompt: &dyn UserPrompt,
    ) -> HistoryResult<Option<ContextAction>> {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                if InputState::starts_pan(button, modifiers) {
                    self.input.begin_pan(position);
                } else if button == MouseButton::Right {
                    return self.context_click(position, prompt).map(Some);
                } else {
                    self.click(position, modifiers)?;
                }
            }
            PointerEvent::Move { position } => {
                if let Some(delta) = self.input.pointer_moved(position) {
                    self.camera.pan(delta);
                }
            }
            PointerEvent::Up { .. } => self.input.end_pan(),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => {
                if modifiers.command() {
                    self.camera.wheel_zoom(position, delta.y);
                }
            }
        }
        Ok(None)
    }

    /// Dispatch a key press through the shortcut table.
    pub fn handle_key(
        &mut self,
        key: Key,
        modifiers: Modifiers,
    ) -> HistoryResult<Option<EditorCommand>> {
        let Some(command) = resolve_shortcut(key, modifiers) else {
            return Ok(None);
        };
        self.execute(command)?;
        Ok(Some(command))
    }

    /// Run a command. Returns whether it had any effect.
    pub fn execute(&mut self, command: EditorCommand) -> HistoryResult<bool> {
        log::debug!("Executing {command:?}");
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Copy => Ok(self.copy()),
            EditorCommand::Cut => self.cut(),
            EditorCommand::Paste => self.paste(),
            EditorCommand::ToggleGrid => {
                self.toggle_grid();
                Ok(true)
            }
            EditorCommand::Delete => self.delete_selection(),
            EditorCommand::AddText => self.add_text().map(|_| true),
            EditorCommand::Group => self.group_selection().map(|id| id.is_some()),
            EditorCommand::Ungroup => self.ungroup_selection().map(|ids| ids.is_some()),
            EditorCommand::ResetView => {
                self.reset_view();
                Ok(true)
            }
            EditorCommand::EndTextEdit => self.end_text_edit(),
        }
    }
}

/// Parse a finite number from form input.
fn parse_number(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
