//! Plume IO
//!
//! File import (SVG, PNG) and export (SVG, PNG, PDF) for the Plume canvas
//! editor, plus the asset stores they read from and write to.

pub mod export;
pub mod import;
pub mod store;

pub use export::{ExportError, ExportFormat, ExportOptions, ExportResult, Exporter};
pub use import::{ImportError, ImportKind, ImportResult, Importer, UNSUPPORTED_NOTICE};
pub use store::{AssetStore, BoxFuture, FileStore, MemoryStore, StoreError, StoreResult};
