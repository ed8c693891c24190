//! Non-destructive photo edit session.
//!
//! An edit session holds the pristine decoded still plus the current
//! filter/slider selection. Every parameter change re-renders the full
//! composite from the pristine source, never from a previous output, so
//! edits are always relative to the original capture and repeated edits
//! cannot compound lossy degradation. Correctness-critical invariant.

use image::RgbaImage;

use crate::error::ImageError;
use crate::photo::{adjust, Adjustments, EncodedPhoto, FilterPreset};

/// A mutable filter/adjustment selection over one captured still.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Pristine decode of the still this session was seeded with.
    source: RgbaImage,
    /// The previewed still at session open, restored on cancel.
    pre_edit: EncodedPhoto,
    filter: FilterPreset,
    adjustments: Adjustments,
    rendered: RgbaImage,
}

impl EditSession {
    /// Open a session seeded with the currently previewed still.
    ///
    /// Fails with a decode error if the still cannot be decoded; the
    /// caller stays in its prior state.
    pub fn open(still: &EncodedPhoto) -> Result<Self, ImageError> {
        let source = still.decode()?;
        let rendered = source.clone();
        Ok(Self {
            source,
            pre_edit: still.clone(),
            filter: FilterPreset::default(),
            adjustments: Adjustments::default(),
            rendered,
        })
    }

    pub fn filter(&self) -> FilterPreset {
        self.filter
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// The current composite, re-rendered on every parameter change.
    pub fn rendered(&self) -> &RgbaImage {
        &self.rendered
    }

    /// The still to restore when the session is cancelled.
    pub fn pre_edit(&self) -> &EncodedPhoto {
        &self.pre_edit
    }

    pub fn set_filter(&mut self, preset: FilterPreset) {
        self.filter = preset;
        self.rerender();
    }

    pub fn set_brightness(&mut self, percent: u16) {
        self.adjustments.brightness = percent.min(Adjustments::MAX_PERCENT);
        self.rerender();
    }

    pub fn set_contrast(&mut self, percent: u16) {
        self.adjustments.contrast = percent.min(Adjustments::MAX_PERCENT);
        self.rerender();
    }

    pub fn set_saturation(&mut self, percent: u16) {
        self.adjustments.saturation = percent.min(Adjustments::MAX_PERCENT);
        self.rerender();
    }

    // Full composite (preset then sliders) from the pristine source.
    fn rerender(&mut self) {
        let transform = adjust::compose(self.filter, &self.adjustments);
        self.rendered = adjust::render(&self.source, &transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::optimizer::encode;
    use crate::photo::PhotoFormat;

    fn still() -> EncodedPhoto {
        let img = RgbaImage::from_pixel(3, 3, image::Rgba([130, 70, 190, 255]));
        encode(&img, PhotoFormat::Png, 1.0).unwrap()
    }

    #[test]
    fn opens_with_identity_render() {
        let session = EditSession::open(&still()).unwrap();
        assert_eq!(session.filter(), FilterPreset::Normal);
        assert!(session.adjustments().is_identity());
        assert_eq!(session.rendered(), &session.source);
    }

    #[test]
    fn open_fails_on_undecodable_still() {
        let corrupt = EncodedPhoto {
            format: PhotoFormat::Png,
            width: 1,
            height: 1,
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(EditSession::open(&corrupt), Err(ImageError::Decode(_))));
    }

    #[test]
    fn edits_never_compound() {
        let mut session = EditSession::open(&still()).unwrap();

        // Drive the sliders through several values, then back to identity.
        session.set_brightness(180);
        session.set_contrast(40);
        session.set_saturation(150);
        session.set_brightness(100);
        session.set_contrast(100);
        session.set_saturation(100);
        session.set_filter(FilterPreset::Sepia);
        session.set_filter(FilterPreset::Normal);

        // Every change re-rendered from the pristine source, so identity
        // parameters reproduce it exactly up to u8 rounding.
        for (a, b) in session.rendered().pixels().zip(session.source.pixels()) {
            for c in 0..3 {
                assert!((i16::from(a.0[c]) - i16::from(b.0[c])).abs() <= 1);
            }
        }
    }

    #[test]
    fn reapplying_same_filter_is_stable() {
        let mut once = EditSession::open(&still()).unwrap();
        once.set_filter(FilterPreset::Sepia);
        let first = once.rendered().clone();

        once.set_filter(FilterPreset::Sepia);
        assert_eq!(once.rendered(), &first);
    }

    #[test]
    fn slider_input_is_clamped() {
        let mut session = EditSession::open(&still()).unwrap();
        session.set_brightness(10_000);
        assert_eq!(session.adjustments().brightness, 200);
    }
}
