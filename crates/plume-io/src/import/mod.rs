//! Import of vector (SVG) and raster (PNG) files.

mod raster;
mod svg;

pub use raster::decode_png;
pub use svg::parse_svg;

use crate::store::{AssetStore, StoreError};
use plume_core::shapes::ShapeId;
use plume_core::{EditorSession, HistoryError, ImportedContent, UserPrompt};
use std::path::Path;
use thiserror::Error;

/// Notice shown when a file is neither SVG nor PNG.
pub const UNSUPPORTED_NOTICE: &str = "Unsupported file type.";

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid SVG: {0}")]
    Svg(String),
    #[error("Invalid PNG: {0}")]
    Raster(String),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result type for imports.
pub type ImportResult<T> = Result<T, ImportError>;

/// File kinds the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Svg,
    Png,
}

impl ImportKind {
    /// Detect the kind from a file name's extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "svg" => Some(ImportKind::Svg),
            "png" => Some(ImportKind::Png),
            _ => None,
        }
    }
}

/// Reads files from an asset store and applies them to a session.
pub struct Importer<'a> {
    store: &'a dyn AssetStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self { store }
    }

    /// Read and decode a file without touching any scene.
    pub async fn read(&self, name: &str) -> ImportResult<ImportedContent> {
        let kind =
            ImportKind::from_name(name).ok_or_else(|| ImportError::Unsupported(name.to_string()))?;
        let bytes = self.store.read(name).await?;
        log::debug!("Read {} bytes from {name}", bytes.len());

        match kind {
            ImportKind::Svg => {
                let text =
                    String::from_utf8(bytes).map_err(|e| ImportError::Svg(e.to_string()))?;
                parse_svg(&text).map(ImportedContent::Shapes)
            }
            ImportKind::Png => decode_png(bytes),
        }
    }

    /// Read a file, then apply it to `session`.
    ///
    /// The session is only mutated once decoding has finished. Unsupported
    /// files raise a notice through `prompt` and leave the scene alone.
    pub async fn import_into(
        &self,
        session: &mut EditorSession,
        name: &str,
        prompt: &dyn UserPrompt,
    ) -> ImportResult<Option<ShapeId>> {
        let content = match self.read(name).await {
            Ok(content) => content,
            Err(ImportError::Unsupported(name)) => {
                log::warn!("Rejected import of {name}");
                prompt.notify(UNSUPPORTED_NOTICE);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(session.apply_import(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ImportKind::from_name("logo.svg"), Some(ImportKind::Svg));
        assert_eq!(ImportKind::from_name("Photo.PNG"), Some(ImportKind::Png));
        assert_eq!(ImportKind::from_name("dir/shot.png"), Some(ImportKind::Png));
        assert_eq!(ImportKind::from_name("notes.txt"), None);
        assert_eq!(ImportKind::from_name("svg"), None);
    }
}
