//! Plume Core Library
//!
//! Scene graph, undo/redo history and the editing session for the Plume
//! vector canvas editor. Rendering and file formats live in `plume-io`.

pub mod camera;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod history;
pub mod input;
pub mod overlay;
pub mod prompt;
pub mod scene;
pub mod selection;
pub mod session;
pub mod shapes;

pub use camera::Camera;
pub use clipboard::{ClipContent, ClipKind, Clipboard};
pub use command::EditorCommand;
pub use config::{ConfigError, ConfigResult, EditorConfig};
pub use history::{HistoryError, HistoryManager, HistoryResult, MAX_UNDO_HISTORY};
pub use input::{Chord, InputError, InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use overlay::{Overlay, OverlayKind};
pub use prompt::{AutoConfirm, RecordingPrompt, UserPrompt};
pub use scene::{HitTarget, Scene, SceneSnapshot};
pub use selection::Selection;
pub use session::{ContextAction, EditorSession, ImportedContent};
