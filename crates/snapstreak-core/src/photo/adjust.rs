//! Color adjustment pipeline for the photo editor.
//!
//! Filters and slider adjustments are data, not closures: every edit is an
//! [`AdjustOp`] descriptor that lowers to an affine [`ColorTransform`]
//! (3x3 matrix plus offset). Ops compose into a single transform, so a
//! full edit stack is one pixel pass over the source image.
//!
//! Matrix coefficients follow the CSS Filter Effects shorthand functions,
//! which is what the adjustment percentages are calibrated against
//! (100% = identity for brightness/contrast/saturation).

use serde::{Deserialize, Serialize};

/// Affine color transform: `rgb' = m * rgb + offset`, per channel in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    m: [[f32; 3]; 3],
    offset: [f32; 3],
}

impl ColorTransform {
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            offset: [0.0; 3],
        }
    }

    fn matrix(m: [[f32; 3]; 3]) -> Self {
        Self { m, offset: [0.0; 3] }
    }

    /// Transform that applies `self` first, then `next`.
    pub fn then(&self, next: &ColorTransform) -> ColorTransform {
        let mut m = [[0.0f32; 3]; 3];
        let mut offset = [0.0f32; 3];
        for row in 0..3 {
            for col in 0..3 {
                m[row][col] = (0..3).map(|k| next.m[row][k] * self.m[k][col]).sum();
            }
            offset[row] =
                (0..3).map(|k| next.m[row][k] * self.offset[k]).sum::<f32>() + next.offset[row];
        }
        ColorTransform { m, offset }
    }

    /// Apply to one rgb triple (0..1), clamping the result.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        for row in 0..3 {
            let v = self.m[row][0] * rgb[0]
                + self.m[row][1] * rgb[1]
                + self.m[row][2] * rgb[2]
                + self.offset[row];
            out[row] = v.clamp(0.0, 1.0);
        }
        out
    }
}

/// A single composable image adjustment.
///
/// Amounts are linear factors (1.0 = identity) except `HueRotate`,
/// which takes degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "amount", rename_all = "snake_case")]
pub enum AdjustOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Grayscale(f32),
    Sepia(f32),
    HueRotate(f32),
}

impl AdjustOp {
    pub fn transform(&self) -> ColorTransform {
        match *self {
            AdjustOp::Brightness(a) => ColorTransform::matrix([
                [a, 0.0, 0.0],
                [0.0, a, 0.0],
                [0.0, 0.0, a],
            ]),
            AdjustOp::Contrast(a) => {
                let off = 0.5 - 0.5 * a;
                ColorTransform {
                    m: [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
                    offset: [off; 3],
                }
            }
            AdjustOp::Saturate(s) => ColorTransform::matrix([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            AdjustOp::Grayscale(a) => {
                let g = 1.0 - a.clamp(0.0, 1.0);
                ColorTransform::matrix([
                    [0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g],
                    [0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g],
                    [0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g],
                ])
            }
            AdjustOp::Sepia(a) => {
                let g = 1.0 - a.clamp(0.0, 1.0);
                ColorTransform::matrix([
                    [0.393 + 0.607 * g, 0.769 - 0.769 * g, 0.189 - 0.189 * g],
                    [0.349 - 0.349 * g, 0.686 + 0.314 * g, 0.168 - 0.168 * g],
                    [0.272 - 0.272 * g, 0.534 - 0.534 * g, 0.131 + 0.869 * g],
                ])
            }
            AdjustOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                ColorTransform::matrix([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
        }
    }
}

/// Named filter presets offered by the editor, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPreset {
    Normal,
    Grayscale,
    Sepia,
    HighContrast,
    Bright,
    Vintage,
    Cool,
    Warm,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 8] = [
        FilterPreset::Normal,
        FilterPreset::Grayscale,
        FilterPreset::Sepia,
        FilterPreset::HighContrast,
        FilterPreset::Bright,
        FilterPreset::Vintage,
        FilterPreset::Cool,
        FilterPreset::Warm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterPreset::Normal => "Normal",
            FilterPreset::Grayscale => "Grayscale",
            FilterPreset::Sepia => "Sepia",
            FilterPreset::HighContrast => "High Contrast",
            FilterPreset::Bright => "Bright",
            FilterPreset::Vintage => "Vintage",
            FilterPreset::Cool => "Cool",
            FilterPreset::Warm => "Warm",
        }
    }

    /// The ops this preset contributes, applied before slider adjustments.
    pub fn ops(&self) -> Vec<AdjustOp> {
        match self {
            FilterPreset::Normal => vec![],
            FilterPreset::Grayscale => vec![AdjustOp::Grayscale(1.0)],
            FilterPreset::Sepia => vec![AdjustOp::Sepia(1.0)],
            FilterPreset::HighContrast => vec![AdjustOp::Contrast(1.5)],
            FilterPreset::Bright => vec![AdjustOp::Brightness(1.3)],
            FilterPreset::Vintage => vec![
                AdjustOp::Sepia(0.5),
                AdjustOp::Brightness(0.95),
                AdjustOp::Contrast(1.1),
            ],
            FilterPreset::Cool => vec![AdjustOp::Saturate(1.2), AdjustOp::HueRotate(20.0)],
            FilterPreset::Warm => vec![AdjustOp::Saturate(1.2), AdjustOp::HueRotate(-20.0)],
        }
    }
}

impl Default for FilterPreset {
    fn default() -> Self {
        FilterPreset::Normal
    }
}

/// Slider adjustments as percentages in 0..=200, 100 = identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    pub brightness: u16,
    pub contrast: u16,
    pub saturation: u16,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 100,
            saturation: 100,
        }
    }
}

impl Adjustments {
    pub const MAX_PERCENT: u16 = 200;

    /// Clamp all sliders into the valid 0..=200 range.
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.min(Self::MAX_PERCENT),
            contrast: self.contrast.min(Self::MAX_PERCENT),
            saturation: self.saturation.min(Self::MAX_PERCENT),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness == 100 && self.contrast == 100 && self.saturation == 100
    }

    fn ops(&self) -> [AdjustOp; 3] {
        [
            AdjustOp::Brightness(f32::from(self.brightness) / 100.0),
            AdjustOp::Contrast(f32::from(self.contrast) / 100.0),
            AdjustOp::Saturate(f32::from(self.saturation) / 100.0),
        ]
    }
}

/// Compose a preset and slider adjustments into one transform,
/// preset first, then brightness, contrast, saturation.
pub fn compose(preset: FilterPreset, adjustments: &Adjustments) -> ColorTransform {
    let adjustments = adjustments.clamped();
    preset
        .ops()
        .iter()
        .chain(adjustments.ops().iter())
        .fold(ColorTransform::identity(), |acc, op| acc.then(&op.transform()))
}

/// Apply a transform to every pixel, leaving alpha untouched.
///
/// Always renders from the given source; callers must pass the pristine
/// capture so repeated edits never compound.
pub fn render(source: &image::RgbaImage, transform: &ColorTransform) -> image::RgbaImage {
    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let rgb = transform.apply([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ]);
        pixel.0 = [
            (rgb[0] * 255.0).round() as u8,
            (rgb[1] * 255.0).round() as u8,
            (rgb[2] * 255.0).round() as u8,
            a,
        ];
    }
    out
}
