//! Frame preprocessing: canonical resize, illumination normalization and
//! lane-color masking.
//!
//! Steps
//! - Resize to the canonical resolution so every downstream constant (ROI
//!   fractions, blur size, Hough lengths, slope gate) keeps its meaning.
//! - CLAHE on the L\*a\*b\* lightness plane only; chroma is left untouched.
//! - White and yellow range masks, united and applied to the normalized frame.
//!
//! The stage has no failure mode; an empty frame simply yields empty buffers.

pub mod clahe;

pub use clahe::{clahe, ClaheOptions};

use crate::color::{ColorRange, LabPlanes};
use crate::error::Error;
use crate::image::{GrayImageU8, RgbImageU8};
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Canonical (width, height) every frame is resized to.
    pub canonical_size: (usize, usize),
    pub clahe: ClaheOptions,
    /// Bright, low-saturation paint.
    pub white: ColorRange,
    /// Yellow paint (high red and green, low blue).
    pub yellow: ColorRange,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            canonical_size: (640, 480),
            clahe: ClaheOptions::default(),
            white: ColorRange::new([200, 200, 200], [255, 255, 255]),
            yellow: ColorRange::new([100, 100, 0], [255, 255, 80]),
        }
    }
}

impl PreprocessOptions {
    pub fn validate(&self) -> Result<(), Error> {
        let (w, h) = self.canonical_size;
        if w == 0 || h == 0 {
            return Err(Error::InvalidParams(format!(
                "canonical size must be non-zero, got {w}x{h}"
            )));
        }
        self.clahe.validate()
    }
}

/// Buffers produced by the preprocessing stage, all of the canonical size.
#[derive(Clone, Debug)]
pub struct Preprocessed {
    /// Input resized to the canonical resolution.
    pub resized: RgbImageU8,
    /// `resized` after lightness equalization.
    pub normalized: RgbImageU8,
    /// Union of the white and yellow masks (255 = lane-colored).
    pub mask: GrayImageU8,
    /// `normalized` with every non-lane-colored pixel zeroed.
    pub masked: RgbImageU8,
}

/// Resize with a bilinear (triangle) filter; identity when already sized.
pub fn resize_to(frame: &RgbImageU8, size: (usize, usize)) -> RgbImageU8 {
    if frame.dimensions() == size || frame.is_empty() || size.0 == 0 || size.1 == 0 {
        return frame.clone();
    }
    let resized = imageops::resize(
        &frame.to_image(),
        size.0 as u32,
        size.1 as u32,
        FilterType::Triangle,
    );
    RgbImageU8::from_image(resized)
}

/// Equalize lightness with CLAHE, keeping a\*/b\*.
pub fn normalize_illumination(frame: &RgbImageU8, options: &ClaheOptions) -> RgbImageU8 {
    let lab = LabPlanes::from_rgb(frame);
    let equalized = clahe(&lab.l, options);
    lab.with_lightness(equalized).to_rgb()
}

/// Union of the white and yellow range masks.
pub fn lane_color_mask(frame: &RgbImageU8, options: &PreprocessOptions) -> GrayImageU8 {
    options.white.mask(frame).or(&options.yellow.mask(frame))
}

pub fn preprocess(frame: &RgbImageU8, options: &PreprocessOptions) -> Preprocessed {
    let resized = resize_to(frame, options.canonical_size);
    let normalized = normalize_illumination(&resized, &options.clahe);
    let mask = lane_color_mask(&normalized, options);
    let masked = normalized.masked(&mask);
    Preprocessed {
        resized,
        normalized,
        mask,
        masked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn resize_reaches_canonical_size() {
        let frame = RgbImageU8::filled(320, 200, [10, 20, 30]);
        let out = resize_to(&frame, (640, 480));
        assert_eq!(out.dimensions(), (640, 480));
        assert_eq!(out.get(100, 100), [10, 20, 30]);
    }

    #[test]
    fn mask_keeps_white_and_yellow_only() {
        let mut frame = RgbImageU8::filled(3, 1, [60, 60, 60]);
        frame.set(0, 0, [250, 250, 250]);
        frame.set(1, 0, [230, 200, 40]);
        let mask = lane_color_mask(&frame, &PreprocessOptions::default());
        assert_eq!(mask.row(0), &[255, 255, 0]);
    }

    #[test]
    fn preprocess_isolates_painted_stripe() {
        let mut frame = RgbImageU8::filled(640, 480, [70, 70, 70]);
        for y in 300..480 {
            for x in 200..210 {
                frame.set(x, y, [255, 255, 255]);
            }
        }
        let out = preprocess(&frame, &PreprocessOptions::default());
        assert_eq!(out.masked.dimensions(), (640, 480));
        assert_ne!(out.mask.get(205, 400), 0);
        assert_eq!(out.mask.get(50, 50), 0);
        assert_eq!(out.masked.get(50, 50), [0, 0, 0]);
    }
}
