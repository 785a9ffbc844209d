//! PNG export.

use crate::error::{RenderError, RenderResult};
use crate::raster::RasterSurface;
use doodlepad_core::Rgba;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

/// File name used for exported drawings.
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Draw `pixmap` over an opaque `background` and return the RGBA8 bytes.
/// The result is fully opaque, so premultiplied and straight alpha agree.
pub fn composite_on_background(pixmap: &Pixmap, background: Rgba) -> RenderResult<Vec<u8>> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut flat = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
    flat.fill(Color::from_rgba8(background.r, background.g, background.b, 255));
    flat.draw_pixmap(0, 0, pixmap.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    Ok(flat.take())
}

/// Encode RGBA8 pixel data as PNG.
pub fn encode_png(rgba: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSize { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: rgba.len(),
        });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(png_data)
}

/// Export the surface as a PNG composited onto white.
pub fn export_png(surface: &RasterSurface) -> RenderResult<Vec<u8>> {
    let flattened = composite_on_background(surface.pixmap(), Rgba::WHITE)?;
    let png_data = encode_png(&flattened, surface.width(), surface.height())?;
    log::info!(
        "Exported {}x{} drawing ({} bytes)",
        surface.width(),
        surface.height(),
        png_data.len()
    );
    Ok(png_data)
}
