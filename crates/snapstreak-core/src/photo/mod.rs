//! Encoded photo payloads and the image adjustment/optimization pipeline.
//!
//! Photos travel through the system as [`EncodedPhoto`] values: compressed
//! bytes plus format and pixel dimensions. The persisted form is a
//! base64 data URL, matching the key-value store's string values.

pub mod adjust;
pub mod optimizer;

pub use adjust::{AdjustOp, Adjustments, ColorTransform, FilterPreset};
pub use optimizer::{OptimizeOptions, Optimizer};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Output encodings supported by the photo pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFormat {
    WebP,
    Jpeg,
    Png,
}

impl PhotoFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            PhotoFormat::WebP => "image/webp",
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/webp" => Some(PhotoFormat::WebP),
            "image/jpeg" => Some(PhotoFormat::Jpeg),
            "image/png" => Some(PhotoFormat::Png),
            _ => None,
        }
    }
}

/// A compressed image payload with its format and pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPhoto {
    pub format: PhotoFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedPhoto {
    /// Render as a `data:<mime>;base64,<payload>` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime(), BASE64.encode(&self.bytes))
    }

    /// Parse a data URL back into an encoded photo.
    ///
    /// Dimensions are recovered by decoding the payload header.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::InvalidDataUrl("missing 'data:' prefix".into()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ImageError::InvalidDataUrl("missing ';base64,' separator".into()))?;
        let format = PhotoFormat::from_mime(mime)
            .ok_or_else(|| ImageError::UnsupportedFormat(mime.to_string()))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
        Ok(Self {
            format,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }

    /// Decode into raw RGBA pixels.
    pub fn decode(&self) -> Result<image::RgbaImage, ImageError> {
        let img = image::load_from_memory(&self.bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
        Ok(img.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::optimizer::encode;

    fn sample_photo() -> EncodedPhoto {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 200, 30, 255]));
        encode(&img, PhotoFormat::Png, 0.8).unwrap()
    }

    #[test]
    fn data_url_roundtrip() {
        let photo = sample_photo();
        let url = photo.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = EncodedPhoto::from_data_url(&url).unwrap();
        assert_eq!(parsed, photo);
    }

    #[test]
    fn data_url_rejects_garbage() {
        assert!(matches!(
            EncodedPhoto::from_data_url("image/png;nope"),
            Err(ImageError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            EncodedPhoto::from_data_url("data:image/tiff;base64,AAAA"),
            Err(ImageError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            EncodedPhoto::from_data_url("data:image/png;base64,!!notbase64!!"),
            Err(ImageError::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn decode_recovers_pixels() {
        let photo = sample_photo();
        let img = photo.decode().unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert_eq!(img.get_pixel(0, 0).0, [10, 200, 30, 255]);
    }
}
