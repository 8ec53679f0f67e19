use super::border::{map_index, BorderMode};
use crate::image::{GrayImageU8, ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters. Taps are in left-to-right
/// order and are expected to sum to one.
pub trait SeparableFilter {
    fn taps(&self) -> &[f32];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// Normalized 1D Gaussian of odd length.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

// Fixed tables used for small kernels when no sigma is given.
const SMALL_GAUSSIAN_TABLES: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

impl GaussianKernel {
    /// Kernel of odd `size`. A non-positive `sigma` derives it from the size
    /// (`0.3 * ((size - 1) * 0.5 - 1) + 0.8`) and uses the fixed binomial-like
    /// tables for sizes up to 7.
    pub fn new(size: usize, sigma: f32) -> Self {
        debug_assert!(size % 2 == 1, "Gaussian kernel size must be odd");
        if sigma <= 0.0 && size <= 7 {
            return Self {
                taps: SMALL_GAUSSIAN_TABLES[size / 2].to_vec(),
            };
        }
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let center = (size / 2) as f32;
        let scale = -0.5 / (sigma * sigma);
        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let d = i as f32 - center;
                (scale * d * d).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Separable convolution of an 8-bit plane: horizontal pass into a float
/// buffer, vertical pass, then round-to-nearest back to 8 bits.
pub fn convolve_separable<F: SeparableFilter>(
    src: &GrayImageU8,
    filter: &F,
    border: BorderMode,
) -> GrayImageU8 {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return GrayImageU8::new(w, h);
    }
    let taps = filter.taps();
    let radius = filter.radius() as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = horiz.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = map_index(x as isize + k as isize - radius, w, border);
                acc += tap * src_row[sx] as f32;
            }
            *dst_px = acc;
        }
    }

    let mut vert = ImageF32::new(w, h);
    for y in 0..h {
        let rows: Vec<&[f32]> = (0..taps.len())
            .map(|k| horiz.row(map_index(y as isize + k as isize - radius, h, border)))
            .collect();
        let dst_row = vert.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            *dst_px = rows
                .iter()
                .zip(taps.iter())
                .map(|(row, &tap)| tap * row[x])
                .sum();
        }
    }

    vert.to_gray_saturated()
}

/// Gaussian blur with reflect-101 borders.
pub fn gaussian_blur(src: &GrayImageU8, size: usize, sigma: f32) -> GrayImageU8 {
    convolve_separable(src, &GaussianKernel::new(size, sigma), BorderMode::Reflect101)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kernels_are_normalized() {
        for size in [1, 3, 5, 7, 9, 11] {
            let k = GaussianKernel::new(size, 0.0);
            assert_eq!(k.taps().len(), size);
            assert_abs_diff_eq!(k.taps().iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn seven_tap_default_uses_fixed_table() {
        let k = GaussianKernel::new(7, 0.0);
        assert_eq!(k.taps()[3], 0.28125);
        assert_eq!(k.taps()[0], 0.03125);
    }

    #[test]
    fn blur_keeps_constant_plane() {
        let src = GrayImageU8::filled(9, 6, 77);
        let out = gaussian_blur(&src, 7, 0.0);
        assert!(out.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn blur_spreads_single_impulse_symmetrically() {
        let mut src = GrayImageU8::new(15, 15);
        src.set(7, 7, 255);
        let out = gaussian_blur(&src, 7, 0.0);
        assert!(out.get(7, 7) < 255);
        assert_eq!(out.get(6, 7), out.get(8, 7));
        assert_eq!(out.get(7, 6), out.get(7, 8));
        assert_eq!(out.get(0, 0), 0);
    }
}
