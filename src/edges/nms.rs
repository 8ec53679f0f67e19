//! Canny edge detection: non-maximum suppression plus hysteresis.
//!
//! For each pixel the gradient direction is quantized into four bins (0°,
//! 45°, 90°, 135°) and the magnitude is compared with its two neighbours
//! along that direction. Horizontal and vertical bins require the pixel to be
//! strictly greater than the backward neighbour and greater or equal to the
//! forward one, so plateaus of width two keep exactly one pixel; diagonal
//! bins require strict maxima on both sides. Neighbours outside the image
//! count as zero magnitude.
//!
//! Surviving pixels with `mag > low` are candidates, those with `mag > high`
//! are strong; candidates 8-connected to a strong pixel become edges. Strict
//! comparisons mean a zero-gradient plane yields no edges, even with both
//! thresholds at zero.
use super::grad::{sobel_gradients, Grad};
use crate::image::{GrayImageU8, ImageView};
use serde::Serialize;
use std::time::Instant;

const TAN_22_5_DEG: f32 = 0.414_213_56;
const TAN_67_5_DEG: f32 = 2.414_213_6;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const EDGE: u8 = 2;

/// Hysteresis thresholds on the L1 Sobel magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

#[inline]
fn mag_at(grad: &Grad, x: isize, y: isize) -> f32 {
    grad.mag.pixel_checked(x, y).unwrap_or(0.0)
}

fn is_local_max(grad: &Grad, x: usize, y: usize) -> bool {
    let m = grad.mag.get(x, y);
    let dx = grad.gx.get(x, y);
    let dy = grad.gy.get(x, y);
    let (xi, yi) = (x as isize, y as isize);
    let abs_dx = dx.abs();
    let abs_dy = dy.abs();

    if abs_dy < TAN_22_5_DEG * abs_dx {
        m > mag_at(grad, xi - 1, yi) && m >= mag_at(grad, xi + 1, yi)
    } else if abs_dy > TAN_67_5_DEG * abs_dx {
        m > mag_at(grad, xi, yi - 1) && m >= mag_at(grad, xi, yi + 1)
    } else {
        let s = if (dx < 0.0) != (dy < 0.0) { -1 } else { 1 };
        m > mag_at(grad, xi - s, yi - 1) && m > mag_at(grad, xi + s, yi + 1)
    }
}

/// Suppress non-maxima and classify survivors as weak/strong candidates.
/// Returns the per-pixel state map and the strong seeds.
fn suppress(grad: &Grad, thresholds: CannyThresholds) -> (Vec<u8>, Vec<(usize, usize)>) {
    let (w, h) = grad.mag.dimensions();
    let mut state = vec![NOT_EDGE; w * h];
    let mut seeds = Vec::new();
    for y in 0..h {
        let mag_row = grad.mag.row(y);
        for x in 0..w {
            let m = mag_row[x];
            if m <= thresholds.low || !is_local_max(grad, x, y) {
                continue;
            }
            if m > thresholds.high {
                state[y * w + x] = EDGE;
                seeds.push((x, y));
            } else {
                state[y * w + x] = WEAK;
            }
        }
    }
    (state, seeds)
}

fn hysteresis(state: &mut [u8], mut stack: Vec<(usize, usize)>, w: usize, h: usize) {
    while let Some((x, y)) = stack.pop() {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                    continue;
                }
                let idx = ny as usize * w + nx as usize;
                if state[idx] == WEAK {
                    state[idx] = EDGE;
                    stack.push((nx as usize, ny as usize));
                }
            }
        }
    }
}

/// Binary edge map from precomputed gradients.
pub fn canny_from_gradients(grad: &Grad, thresholds: CannyThresholds) -> GrayImageU8 {
    let (w, h) = grad.mag.dimensions();
    let (mut state, seeds) = suppress(grad, thresholds);
    hysteresis(&mut state, seeds, w, h);

    let data = state
        .into_iter()
        .map(|s| if s == EDGE { 255 } else { 0 })
        .collect();
    GrayImageU8::from_raw(w, h, data).unwrap_or_else(|_| GrayImageU8::new(w, h))
}

/// Edge map with the time spent in each Canny step.
pub struct CannyResult {
    pub edges: GrayImageU8,
    pub gradient_ms: f64,
    /// Suppression plus hysteresis.
    pub nms_ms: f64,
}

/// Canny edge detection on an 8-bit plane (no internal smoothing).
pub fn canny(src: &GrayImageU8, thresholds: CannyThresholds) -> CannyResult {
    let gradient_start = Instant::now();
    let grad = sobel_gradients(src);
    let gradient_ms = gradient_start.elapsed().as_secs_f64() * 1000.0;

    let nms_start = Instant::now();
    let edges = canny_from_gradients(&grad, thresholds);
    let nms_ms = nms_start.elapsed().as_secs_f64() * 1000.0;

    CannyResult {
        edges,
        gradient_ms,
        nms_ms,
    }
}
