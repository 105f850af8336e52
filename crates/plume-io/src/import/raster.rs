//! PNG import.

use super::{ImportError, ImportResult};
use image::ImageFormat;
use plume_core::ImportedContent;

/// Validate PNG bytes and read their natural size. The encoded bytes are
/// kept as-is for embedding.
pub fn decode_png(data: Vec<u8>) -> ImportResult<ImportedContent> {
    let decoded = image::load_from_memory_with_format(&data, ImageFormat::Png)
        .map_err(|e| ImportError::Raster(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    log::debug!("Decoded {width}x{height} PNG");
    Ok(ImportedContent::Image {
        data,
        width,
        height,
    })
}
