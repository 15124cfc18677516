//! Local image operations: upload format sniffing and nine-grid panel
//! cropping.

use std::io::Cursor;

use base64::Engine;
use image::ImageFormat;
use shotflow_core::ninegrid;
use shotflow_core::types::ImageRef;

use crate::error::GenError;

/// Whether uploaded bytes are a supported still-image format.
///
/// Detection is header-only; the full image is not decoded.
pub fn is_supported_image(bytes: &[u8]) -> bool {
    matches!(
        image::guess_format(bytes),
        Ok(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP),
    )
}

/// Encode image bytes as a `data:` URI image reference.
///
/// Rejects bytes that are not a supported still-image format.
pub fn data_uri(bytes: &[u8]) -> Result<ImageRef, GenError> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => return Err(GenError::Image("unsupported image format".to_string())),
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

/// Crop one panel out of a composite nine-grid image.
///
/// The panel's sub-rectangle is the row-major third-by-third cell for
/// `index`; the crop is re-encoded as PNG.
pub fn crop_panel(composite: &[u8], index: usize) -> Result<Vec<u8>, GenError> {
    let rect = ninegrid::panel_rect(index).map_err(|e| GenError::Image(e.to_string()))?;

    let image = image::load_from_memory(composite)
        .map_err(|e| GenError::Image(format!("cannot decode composite: {e}")))?;

    let (x, y, w, h) = ninegrid::pixel_bounds(rect, image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(GenError::Image(format!(
            "composite too small to crop: {}x{}",
            image.width(),
            image.height(),
        )));
    }

    let panel = image.crop_imm(x, y, w, h);
    let mut out = Cursor::new(Vec::new());
    panel
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| GenError::Image(format!("cannot encode panel: {e}")))?;
    Ok(out.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    /// A 90x90 composite whose nine 30x30 cells each have a distinct red level.
    fn composite() -> Vec<u8> {
        let mut img = RgbImage::new(90, 90);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let cell = (y / 30) * 3 + (x / 30);
            *pixel = image::Rgb([cell as u8 * 20, 0, 0]);
        }
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn png_bytes_are_supported() {
        assert!(is_supported_image(&composite()));
    }

    #[test]
    fn arbitrary_bytes_are_rejected() {
        assert!(!is_supported_image(b"this is not an image"));
        assert!(!is_supported_image(b""));
    }

    #[test]
    fn data_uri_carries_detected_mime() {
        let uri = data_uri(&composite()).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn data_uri_rejects_non_images() {
        assert!(data_uri(b"plain text").is_err());
    }

    #[test]
    fn cropped_panel_has_cell_dimensions() {
        let panel = crop_panel(&composite(), 4).unwrap();
        let decoded = image::load_from_memory(&panel).unwrap();
        assert_eq!(decoded.width(), 30);
        assert_eq!(decoded.height(), 30);
    }

    #[test]
    fn center_panel_carries_center_cell_pixels() {
        let panel = crop_panel(&composite(), 4).unwrap();
        let decoded = image::load_from_memory(&panel).unwrap().to_rgb8();
        // Cell 4's red level is 4 * 20.
        assert_eq!(decoded.get_pixel(0, 0)[0], 80);
        assert_eq!(decoded.get_pixel(29, 29)[0], 80);
    }

    #[test]
    fn out_of_range_index_fails() {
        assert!(crop_panel(&composite(), 9).is_err());
    }

    #[test]
    fn undecodable_composite_fails() {
        let err = crop_panel(b"not an image", 0).unwrap_err();
        assert!(matches!(err, GenError::Image(_)));
    }
}
