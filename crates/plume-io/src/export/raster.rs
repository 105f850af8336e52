//! Raster export through resvg.

use super::svg::render_svg;
use super::{ExportError, ExportOptions, ExportResult};
use plume_core::{Camera, Scene};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use std::sync::Arc;

/// Straight-alpha RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, four bytes per pixel.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4)?.try_into().ok()
    }

    /// Split into color and alpha planes.
    pub fn split_alpha(&self) -> (Vec<u8>, Vec<u8>) {
        let count = self.pixels.len() / 4;
        let mut rgb = Vec::with_capacity(count * 3);
        let mut alpha = Vec::with_capacity(count);
        for px in self.pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        (rgb, alpha)
    }
}

/// Render the scene at `options.multiplier` pixels per canvas pixel.
pub fn rasterize(
    scene: &Scene,
    camera: &Camera,
    options: &ExportOptions,
) -> ExportResult<RasterImage> {
    let multiplier = options.multiplier.max(1);
    let size = scene.size();
    let width = scaled_dimension(size.width, multiplier)?;
    let height = scaled_dimension(size.height, multiplier)?;

    let markup = render_svg(scene, camera);

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_str(&markup, &opt)
        .map_err(|e| ExportError::Svg(format!("SVG parsing failed: {e}")))?;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Raster(format!("Cannot allocate {width}x{height} pixmap")))?;
    if options.white_background {
        pixmap.fill(Color::WHITE);
    }

    let scale = multiplier as f32;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    log::debug!("Rasterized scene at {width}x{height}");

    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(RasterImage {
        width,
        height,
        pixels,
    })
}

/// Output pixels along one canvas axis.
fn scaled_dimension(length: f64, multiplier: u32) -> ExportResult<u32> {
    let base = length.round().max(1.0);
    if !base.is_finite() || base > u32::MAX as f64 {
        return Err(ExportError::Raster(format!("Canvas dimension {length} is too large")));
    }
    (base as u32).checked_mul(multiplier).ok_or_else(|| {
        ExportError::Raster(format!("{length} px at {multiplier}x does not fit an image"))
    })
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(image: &RasterImage) -> ExportResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
    }
    Ok(png_data)
}
