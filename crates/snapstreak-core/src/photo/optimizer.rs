//! Image optimizer: bounded resize plus lossy re-encode.
//!
//! Every photo entering the system passes through [`Optimizer::optimize`]
//! before it is previewed or stored, so payloads stay within a fixed
//! dimension budget regardless of the device sensor.

use std::sync::atomic::{AtomicBool, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{EncodedPhoto, PhotoFormat};
use crate::error::ImageError;

/// Optimization parameters.
///
/// Defaults match the capture pipeline: 1920x1080 bounds, 0.8 quality,
/// WebP preferred with JPEG fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Lossy quality in 0.0..=1.0.
    pub quality: f32,
    pub preferred_format: PhotoFormat,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 0.8,
            preferred_format: PhotoFormat::WebP,
        }
    }
}

/// Encode raw pixels at the given quality.
///
/// The codec stack has no lossy WebP encoder, so a WebP request below
/// quality 1.0 is reported as unsupported; lossless WebP (quality 1.0)
/// and JPEG/PNG encode directly.
pub fn encode(img: &RgbaImage, format: PhotoFormat, quality: f32) -> Result<EncodedPhoto, ImageError> {
    let mut bytes = Vec::new();
    match format {
        PhotoFormat::Jpeg => {
            // JPEG carries no alpha channel.
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let q = ((quality.clamp(0.0, 1.0) * 100.0) as u8).max(1);
            let encoder = JpegEncoder::new_with_quality(&mut bytes, q);
            rgb.write_with_encoder(encoder)?;
        }
        PhotoFormat::Png => {
            let encoder = PngEncoder::new(&mut bytes);
            img.write_with_encoder(encoder)?;
        }
        PhotoFormat::WebP => {
            if quality < 1.0 {
                return Err(ImageError::UnsupportedFormat(
                    "lossy webp encoding is unavailable".into(),
                ));
            }
            let encoder = WebPEncoder::new_lossless(&mut bytes);
            img.write_with_encoder(encoder)?;
        }
    }
    Ok(EncodedPhoto {
        format,
        width: img.width(),
        height: img.height(),
        bytes,
    })
}

/// Resize/re-encode images into a bounded, storage-efficient form.
///
/// Exposes a busy flag so callers can disable interactive controls while
/// a (potentially slow) re-encode is in flight.
#[derive(Debug, Default)]
pub struct Optimizer {
    processing: AtomicBool,
}

/// Clears the busy flag on every exit path, including errors.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an optimization pass is currently in flight.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Decode, bound, and re-encode an already-encoded photo.
    ///
    /// Fails with [`ImageError::Decode`] if the source cannot be decoded;
    /// the caller's prior state is left unchanged.
    pub fn optimize(
        &self,
        photo: &EncodedPhoto,
        options: &OptimizeOptions,
    ) -> Result<EncodedPhoto, ImageError> {
        let img = photo.decode()?;
        self.optimize_image(&img, options)
    }

    /// Bound and encode raw pixels (captured frames, rendered composites).
    ///
    /// Scales down only, preserving aspect ratio with the tighter of the
    /// two bound ratios; an in-bounds source keeps its dimensions.
    pub fn optimize_image(
        &self,
        img: &RgbaImage,
        options: &OptimizeOptions,
    ) -> Result<EncodedPhoto, ImageError> {
        self.processing.store(true, Ordering::Release);
        let _guard = ProcessingGuard(&self.processing);

        let (width, height) = bounded_dimensions(
            img.width(),
            img.height(),
            options.max_width,
            options.max_height,
        );
        let resized;
        let source = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            resized = imageops::resize(img, width, height, FilterType::Triangle);
            &resized
        };

        match encode(source, options.preferred_format, options.quality) {
            Ok(photo) => Ok(photo),
            // Fall back to the universally supported lossy format at the
            // same quality.
            Err(ImageError::UnsupportedFormat(_)) if options.preferred_format != PhotoFormat::Jpeg => {
                encode(source, PhotoFormat::Jpeg, options.quality)
            }
            Err(e) => Err(e),
        }
    }
}

/// Fit `(width, height)` within the bounds, never scaling up.
fn bounded_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let w = ((f64::from(width) * ratio).floor() as u32).max(1);
    let h = ((f64::from(height) * ratio).floor() as u32).max(1);
    (w, h)
}
