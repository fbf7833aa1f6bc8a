//! Image loading utilities for texture data
//!
//! Decodes PNG and JPEG into RGBA8 pixels ready for upload by the render host.

use crate::assets::{Asset, AssetError};

/// Decoded texture pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Decode an image from memory
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to decode image: {e}")))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Decoded image {width}x{height}");

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }
}

impl Asset for ImageData {
    const KIND: &'static str = "texture";

    fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        Self::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let mut encoded = Vec::new();
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let img = ImageData::decode(&encoded).unwrap();
        assert_eq!((img.width, img.height), (2, 3));
        assert_eq!(img.data.len(), 2 * 3 * 4);
        assert_eq!(&img.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(ImageData::decode(b"not an image"), Err(AssetError::LoadFailed(_))));
    }
}
