//! Edge extraction with content-adaptive Canny thresholds.
//!
//! The masked frame is converted to luma, smoothed with an odd Gaussian, and
//! passed through Canny whose thresholds scale with the median brightness of
//! the smoothed plane:
//!
//! - `low  = trunc(clamp(low_ratio  * median, 0, 255))`
//! - `high = trunc(clamp(high_ratio * median, 0, 255))`
//!
//! Fixed thresholds break across lighting conditions; tying them to the
//! frame's own brightness keeps edge density roughly stable. A fully masked
//! (black) frame has median 0 and thresholds (0, 0); Canny's strict
//! comparisons then report no edges instead of failing.
//!
//! Modules
//! - [`grad`] – 3×3 Sobel gradients with L1 magnitude.
//! - [`nms`] – non-maximum suppression and hysteresis.

pub mod grad;
pub mod nms;

pub use grad::{sobel_gradients, Grad};
pub use nms::{canny, canny_from_gradients, CannyResult, CannyThresholds};

use crate::color::to_gray;
use crate::error::Error;
use crate::filters::gaussian_blur;
use crate::image::{GrayImageU8, RgbImageU8};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    /// Odd Gaussian kernel size applied before Canny.
    pub blur_kernel: usize,
    /// Gaussian sigma; `<= 0` derives it from the kernel size.
    pub blur_sigma: f32,
    /// Multiplier of the median for the low hysteresis threshold.
    pub low_ratio: f32,
    /// Multiplier of the median for the high hysteresis threshold.
    pub high_ratio: f32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            blur_kernel: 7,
            blur_sigma: 0.0,
            low_ratio: 0.7,
            high_ratio: 1.3,
        }
    }
}

impl EdgeOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(Error::InvalidParams(format!(
                "blur kernel must be odd and positive, got {}",
                self.blur_kernel
            )));
        }
        let ratios = [self.low_ratio, self.high_ratio];
        if ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(Error::InvalidParams(format!(
                "threshold ratios must be non-negative, got {ratios:?}"
            )));
        }
        Ok(())
    }
}

/// Thresholds derived from one frame, with the median they came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveThresholds {
    pub median: f32,
    pub canny: CannyThresholds,
}

/// Output of the edge stage.
#[derive(Clone, Debug)]
pub struct EdgeExtraction {
    pub gray: GrayImageU8,
    pub blurred: GrayImageU8,
    pub thresholds: AdaptiveThresholds,
    /// Binary edge map (255 = edge).
    pub edges: GrayImageU8,
    pub edge_count: usize,
    pub gradient_ms: f64,
    pub nms_ms: f64,
}

/// Median of an 8-bit plane; the mean of the two middle values when the pixel
/// count is even. An empty plane has median 0.
pub fn median_u8(plane: &GrayImageU8) -> f32 {
    let data = plane.data();
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mut hist = [0usize; 256];
    for &v in data {
        hist[v as usize] += 1;
    }

    // Value at 0-based rank `k` in sorted order.
    let nth = |k: usize| -> usize {
        let mut seen = 0usize;
        for (value, &count) in hist.iter().enumerate() {
            seen += count;
            if seen > k {
                return value;
            }
        }
        255
    };

    if n % 2 == 1 {
        nth(n / 2) as f32
    } else {
        (nth(n / 2 - 1) + nth(n / 2)) as f32 * 0.5
    }
}

pub fn adaptive_thresholds(blurred: &GrayImageU8, options: &EdgeOptions) -> AdaptiveThresholds {
    let median = median_u8(blurred);
    let low = (options.low_ratio * median).clamp(0.0, 255.0).trunc();
    let high = (options.high_ratio * median).clamp(0.0, 255.0).trunc();
    AdaptiveThresholds {
        median,
        canny: CannyThresholds { low, high },
    }
}

/// Run the full edge stage on a (masked) color frame.
pub fn extract_edges(frame: &RgbImageU8, options: &EdgeOptions) -> EdgeExtraction {
    let gray = to_gray(frame);
    let blurred = gaussian_blur(&gray, options.blur_kernel, options.blur_sigma);
    let thresholds = adaptive_thresholds(&blurred, options);
    let CannyResult {
        edges,
        gradient_ms,
        nms_ms,
    } = canny(&blurred, thresholds.canny);
    let edge_count = edges.count_nonzero();
    EdgeExtraction {
        gray,
        blurred,
        thresholds,
        edges,
        edge_count,
        gradient_ms,
        nms_ms,
    }
}
