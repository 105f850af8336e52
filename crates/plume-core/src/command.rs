//! Editor commands produced by shortcuts and front ends.

use serde::{Deserialize, Serialize};

/// A discrete editing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorCommand {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    ToggleGrid,
    Delete,
    AddText,
    Group,
    Ungroup,
    ResetView,
    /// Leave in-place text editing.
    EndTextEdit,
}

impl EditorCommand {
    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
            EditorCommand::Copy => "Copy selection",
            EditorCommand::Cut => "Cut selection",
            EditorCommand::Paste => "Paste",
            EditorCommand::ToggleGrid => "Toggle grid",
            EditorCommand::Delete => "Delete selection",
            EditorCommand::AddText => "Add text",
            EditorCommand::Group => "Group selection",
            EditorCommand::Ungroup => "Ungroup selection",
            EditorCommand::ResetView => "Reset zoom and pan",
            EditorCommand::EndTextEdit => "Finish text editing",
        }
    }
}
