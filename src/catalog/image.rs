//! Product image fetching, decoding and downscaling.
//!
//! Pure presentation: a failure here never blocks search or ledger writes,
//! the detail panel just shows no image.

use thiserror::Error;
use url::Url;

use crate::http_client;

/// Upper bound for a fetched image body.
const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Errors while fetching or decoding a product image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Image request failed: {0}")]
    Fetch(Box<ureq::Error>),
    #[error("Could not read image response: {0}")]
    Read(#[from] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded RGBA image sized for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA bytes, row-major.
    pub rgba: Vec<u8>,
}

/// Fetch an image URL and decode it, downscaled to fit `max_edge` pixels.
pub fn fetch(image_url: &str, max_edge: u32) -> Result<ProductImage, ImageError> {
    let url = Url::parse(image_url)?;
    let response = http_client::agent()
        .request_url("GET", &url)
        .call()
        .map_err(|err| ImageError::Fetch(Box::new(err)))?;
    let bytes = http_client::read_response_bytes(response, MAX_IMAGE_BYTES)?;
    decode_and_resize(&bytes, max_edge)
}

/// Decode raw bytes and downscale so neither edge exceeds `max_edge`.
///
/// Images already small enough keep their dimensions; aspect ratio is always
/// preserved.
pub fn decode_and_resize(bytes: &[u8], max_edge: u32) -> Result<ProductImage, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let scaled = if decoded.width() > max_edge || decoded.height() > max_edge {
        decoded.thumbnail(max_edge, max_edge)
    } else {
        decoded
    };
    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ProductImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn small_images_keep_their_size() {
        let decoded = decode_and_resize(&png_bytes(10, 6), 160).unwrap();
        assert_eq!((decoded.width, decoded.height), (10, 6));
        assert_eq!(decoded.rgba.len(), 10 * 6 * 4);
    }

    #[test]
    fn large_images_fit_the_display_edge() {
        let decoded = decode_and_resize(&png_bytes(640, 320), 160).unwrap();
        assert!(decoded.width <= 160 && decoded.height <= 160);
        // Aspect ratio preserved: 2:1 stays 2:1.
        assert_eq!(decoded.width, decoded.height * 2);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_and_resize(b"not an image", 160),
            Err(ImageError::Decode(_))
        ));
    }
}
