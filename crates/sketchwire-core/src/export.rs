//! PNG export of the surface and data-URL helpers.

use crate::error::ExportError;
use crate::surface::Surface;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Cursor;

/// File name offered when the canvas is downloaded.
pub const EXPORT_FILE_NAME: &str = "canvas_image.png";

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Encode the surface as PNG bytes.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .write_image_data(surface.pixels())
            .map_err(|e| ExportError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

/// Decode PNG bytes into RGBA8, expanding other 8-bit color types.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, ExportError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ExportError::Decode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ExportError::Decode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let pixels = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            return Err(ExportError::Decode(format!("unsupported color type {:?}", other)));
        }
    };

    Ok(RgbaImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Extract the PNG bytes from a `data:image/png;base64,` URL.
pub fn from_data_url(url: &str) -> Result<Vec<u8>, ExportError> {
    let payload = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| ExportError::DataUrl("expected a base64 PNG data URL".to_string()))?;
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ExportError::DataUrl(e.to_string()))
}

/// Encode the surface straight to a data URL.
pub fn surface_to_data_url(surface: &Surface) -> Result<String, ExportError> {
    Ok(to_data_url(&encode_png(surface)?))
}

/// Write the surface as a PNG file.
#[cfg(not(target_arch = "wasm32"))]
pub fn export_to_file(surface: &Surface, path: &std::path::Path) -> Result<(), ExportError> {
    let png = encode_png(surface)?;
    std::fs::write(path, &png)
        .map_err(|e| ExportError::Encode(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("PNG export complete: {} bytes to {}", png.len(), path.display());
    Ok(())
}
