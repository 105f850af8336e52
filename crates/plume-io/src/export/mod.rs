//! Scene export to SVG, PNG and PDF.
//!
//! SVG markup is the intermediate for every format: PNG rasterizes it with
//! resvg at the oversampling multiplier, and PDF wraps that raster in a
//! single page sized to the canvas.

mod pdf;
mod raster;
mod svg;

pub use pdf::render_pdf;
pub use raster::{RasterImage, encode_png, rasterize};
pub use svg::render_svg;

use crate::store::{AssetStore, StoreError};
use plume_core::{Camera, EditorConfig, EditorSession, Scene, UserPrompt};
use thiserror::Error;

/// Question asked before raster export.
pub const WHITE_BACKGROUND_QUESTION: &str = "Export with white background?";

/// Base name of every export artifact.
pub const EXPORT_BASE_NAME: &str = "canvas_export";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("SVG rendering failed: {0}")]
    Svg(String),
    #[error("Rasterization failed: {0}")]
    Raster(String),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Writing export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for exports.
pub type ExportResult<T> = Result<T, ExportError>;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SVG markup sized to the canvas.
    Svg,
    /// Oversampled raster image.
    Png,
    /// Single-page document wrapping the raster image.
    Pdf,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Svg, ExportFormat::Png, ExportFormat::Pdf]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Download name, e.g. `canvas_export.png`.
    pub fn file_name(&self) -> String {
        format!("{EXPORT_BASE_NAME}.{}", self.extension())
    }
}

/// Raster settings shared by PNG and PDF export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output pixels per canvas pixel.
    pub multiplier: u32,
    /// Paint the canvas white before rendering instead of leaving it
    /// transparent.
    pub white_background: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            multiplier: 3,
            white_background: false,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            multiplier: config.export_multiplier.max(1),
            ..Self::default()
        }
    }

    pub fn with_white_background(mut self, white: bool) -> Self {
        self.white_background = white;
        self
    }

    /// Let the user choose the background.
    pub fn ask_background(self, prompt: &dyn UserPrompt) -> Self {
        self.with_white_background(prompt.confirm(WHITE_BACKGROUND_QUESTION))
    }
}

/// Renders sessions and scenes into export artifacts.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export a session's scene. Overlays are hidden and the viewport reset
    /// for the duration of the render, then restored.
    pub fn render(&self, session: &mut EditorSession, format: ExportFormat) -> ExportResult<Vec<u8>> {
        session.with_export_view(|scene, camera| self.render_scene(scene, camera, format))
    }

    /// Export a scene as seen through `camera`.
    pub fn render_scene(
        &self,
        scene: &Scene,
        camera: &Camera,
        format: ExportFormat,
    ) -> ExportResult<Vec<u8>> {
        match format {
            ExportFormat::Svg => Ok(render_svg(scene, camera).into_bytes()),
            ExportFormat::Png => {
                let image = rasterize(scene, camera, &self.options)?;
                encode_png(&image)
            }
            ExportFormat::Pdf => {
                let image = rasterize(scene, camera, &self.options)?;
                render_pdf(&image, scene.size())
            }
        }
    }

    /// Render `format` and write it to `store` as `canvas_export.<ext>`.
    /// Returns the written name.
    pub async fn export_to(
        &self,
        session: &mut EditorSession,
        format: ExportFormat,
        store: &dyn AssetStore,
    ) -> ExportResult<String> {
        let bytes = self.render(session, format)?;
        let name = format.file_name();
        let len = bytes.len();
        store.write(&name, bytes).await?;
        log::info!("Exported {name} ({len} bytes)");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::RecordingPrompt;

    #[test]
    fn test_file_names() {
        let names: Vec<String> = ExportFormat::all().iter().map(|f| f.file_name()).collect();
        assert_eq!(
            names,
            vec!["canvas_export.svg", "canvas_export.png", "canvas_export.pdf"]
        );
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_background_question() {
        let prompt = RecordingPrompt::answering(true);
        let options = ExportOptions::default().ask_background(&prompt);
        assert!(options.white_background);
        assert_eq!(options.multiplier, 3);
        assert_eq!(
            prompt.confirmations(),
            vec![WHITE_BACKGROUND_QUESTION.to_string()]
        );
    }

    #[test]
    fn test_write_failures_are_reported() {
        let err = ExportError::from(std::io::Error::other("disk full"));
        assert!(matches!(err, ExportError::Io(_)));
        assert_eq!(err.to_string(), "Writing export failed: disk full");
    }

    #[test]
    fn test_options_from_config() {
        let config = EditorConfig {
            export_multiplier: 2,
            ..EditorConfig::default()
        };
        assert_eq!(ExportOptions::from_config(&config).multiplier, 2);
    }
}
