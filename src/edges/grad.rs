//! Image gradients (3×3 Sobel) with L1 magnitude.
//!
//! - Convolves the X/Y kernel pair with replicated borders.
//! - Outputs per-pixel `gx`, `gy` and `mag = |gx| + |gy|`.
//!
//! Values stay on the 0..255 intensity scale of the input plane, so the
//! magnitude range is `0..=2040` and Canny thresholds apply directly.
//!
//! Complexity: O(W·H); memory: three float buffers.
use crate::filters::{map_index, BorderMode};
use crate::image::{GrayImageU8, ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient buffers.
#[derive(Clone, Debug, Default)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// L1 magnitude per pixel: `|gx| + |gy|`
    pub mag: ImageF32,
}

/// Compute Sobel gradients of an 8-bit plane.
pub fn sobel_gradients(src: &GrayImageU8) -> Grad {
    let (w, h) = src.dimensions();
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let rows = [
            src.row(map_index(y as isize - 1, h, BorderMode::Replicate)),
            src.row(y),
            src.row(map_index(y as isize + 1, h, BorderMode::Replicate)),
        ];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [
                map_index(x as isize - 1, w, BorderMode::Replicate),
                x,
                map_index(x as isize + 1, w, BorderMode::Replicate),
            ];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                for (k, &xx) in x_idx.iter().enumerate() {
                    let sample = row[xx] as f32;
                    sum_x += sample * kx_row[k];
                    sum_y += sample * ky_row[k];
                }
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = sum_x.abs() + sum_y.abs();
        }
    }

    Grad { gx, gy, mag }
}
