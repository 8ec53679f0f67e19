//! Color conversions and range masks on 8-bit RGB frames.
//!
//! - Grayscale uses BT.601 luma weights in 14-bit fixed point.
//! - L\*a\*b\* follows the usual 8-bit encoding: sRGB companding, D65 white,
//!   `L` scaled from 0..100 to 0..255, `a`/`b` offset by 128. The round trip
//!   RGB → Lab → RGB is exact for neutral extremes (black, white) and within a
//!   couple of levels elsewhere.
use crate::image::{GrayImageU8, ImageView, RgbImageU8};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

const GRAY_SHIFT: u32 = 14;
const GRAY_R: u32 = 4899;
const GRAY_G: u32 = 9617;
const GRAY_B: u32 = 1868;

const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;
const LAB_EPS: f32 = 0.008856;
const LAB_KAPPA: f32 = 903.3;

/// Inclusive per-channel RGB bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, px: [u8; 3]) -> bool {
        (0..3).all(|c| px[c] >= self.lower[c] && px[c] <= self.upper[c])
    }

    /// 255 where the pixel lies in range, 0 elsewhere.
    pub fn mask(&self, frame: &RgbImageU8) -> GrayImageU8 {
        frame.to_plane(|px| if self.contains(px) { 255 } else { 0 })
    }
}

#[inline]
pub fn rgb_to_gray(px: [u8; 3]) -> u8 {
    let acc = GRAY_R * px[0] as u32 + GRAY_G * px[1] as u32 + GRAY_B * px[2] as u32;
    ((acc + (1 << (GRAY_SHIFT - 1))) >> GRAY_SHIFT) as u8
}

pub fn to_gray(frame: &RgbImageU8) -> GrayImageU8 {
    frame.to_plane(rgb_to_gray)
}

fn rgb_to_xyz() -> Matrix3<f32> {
    Matrix3::new(
        0.412453, 0.357580, 0.180423, //
        0.212671, 0.715160, 0.072169, //
        0.019334, 0.119193, 0.950227,
    )
}

fn xyz_to_rgb() -> Matrix3<f32> {
    Matrix3::new(
        3.240479, -1.537150, -0.498535, //
        -0.969256, 1.875991, 0.041556, //
        0.055648, -0.204043, 1.057311,
    )
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPS {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    let t = f * f * f;
    if t > LAB_EPS {
        t
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Separate 8-bit L, a, b planes of one frame.
#[derive(Clone, Debug)]
pub struct LabPlanes {
    pub l: GrayImageU8,
    pub a: GrayImageU8,
    pub b: GrayImageU8,
}

impl LabPlanes {
    pub fn from_rgb(frame: &RgbImageU8) -> Self {
        let (w, h) = frame.dimensions();
        let m = rgb_to_xyz();
        let lut: Vec<f32> = (0..256).map(|v| srgb_to_linear(v as f32 / 255.0)).collect();

        let mut l = GrayImageU8::new(w, h);
        let mut a = GrayImageU8::new(w, h);
        let mut b = GrayImageU8::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let px = frame.get(x, y);
                let rgb = Vector3::new(
                    lut[px[0] as usize],
                    lut[px[1] as usize],
                    lut[px[2] as usize],
                );
                let xyz = m * rgb;
                let fx = lab_f(xyz[0] / WHITE_X);
                let fy = lab_f(xyz[1]);
                let fz = lab_f(xyz[2] / WHITE_Z);
                let lightness = if xyz[1] > LAB_EPS {
                    116.0 * fy - 16.0
                } else {
                    LAB_KAPPA * xyz[1]
                };
                l.set(x, y, saturate_u8(lightness * 255.0 / 100.0));
                a.set(x, y, saturate_u8(500.0 * (fx - fy) + 128.0));
                b.set(x, y, saturate_u8(200.0 * (fy - fz) + 128.0));
            }
        }
        Self { l, a, b }
    }

    pub fn to_rgb(&self) -> RgbImageU8 {
        let (w, h) = self.l.dimensions();
        let m = xyz_to_rgb();
        let mut out = RgbImageU8::new(w, h);
        for y in 0..h {
            let (lr, ar, br) = (self.l.row(y), self.a.row(y), self.b.row(y));
            for x in 0..w {
                let lightness = lr[x] as f32 * 100.0 / 255.0;
                let a = ar[x] as f32 - 128.0;
                let b = br[x] as f32 - 128.0;

                let (yy, fy) = if lightness > LAB_KAPPA * LAB_EPS {
                    let fy = (lightness + 16.0) / 116.0;
                    (fy * fy * fy, fy)
                } else {
                    let yy = lightness / LAB_KAPPA;
                    (yy, lab_f(yy))
                };
                let xx = lab_f_inv(fy + a / 500.0) * WHITE_X;
                let zz = lab_f_inv(fy - b / 200.0) * WHITE_Z;

                let lin = m * Vector3::new(xx, yy, zz);
                out.set(
                    x,
                    y,
                    [
                        saturate_u8(linear_to_srgb(lin[0].clamp(0.0, 1.0)) * 255.0),
                        saturate_u8(linear_to_srgb(lin[1].clamp(0.0, 1.0)) * 255.0),
                        saturate_u8(linear_to_srgb(lin[2].clamp(0.0, 1.0)) * 255.0),
                    ],
                );
            }
        }
        out
    }

    /// Replace the lightness plane, keeping chroma.
    pub fn with_lightness(self, l: GrayImageU8) -> Self {
        Self { l, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_weights_match_bt601() {
        assert_eq!(rgb_to_gray([0, 0, 0]), 0);
        assert_eq!(rgb_to_gray([255, 255, 255]), 255);
        assert_eq!(rgb_to_gray([255, 0, 0]), 76);
        assert_eq!(rgb_to_gray([0, 255, 0]), 150);
        assert_eq!(rgb_to_gray([0, 0, 255]), 29);
    }

    #[test]
    fn lab_round_trip_preserves_neutrals() {
        let mut frame = RgbImageU8::new(3, 1);
        frame.set(0, 0, [0, 0, 0]);
        frame.set(1, 0, [255, 255, 255]);
        frame.set(2, 0, [128, 128, 128]);
        let lab = LabPlanes::from_rgb(&frame);
        assert_eq!(lab.l.get(0, 0), 0);
        assert_eq!(lab.l.get(1, 0), 255);
        for x in 0..3 {
            assert_eq!(lab.a.get(x, 0), 128);
            assert_eq!(lab.b.get(x, 0), 128);
        }
        let back = lab.to_rgb();
        assert_eq!(back.get(0, 0), [0, 0, 0]);
        assert_eq!(back.get(1, 0), [255, 255, 255]);
        let mid = back.get(2, 0);
        for c in mid {
            assert!((c as i32 - 128).abs() <= 2, "gray drifted: {mid:?}");
        }
    }

    #[test]
    fn lab_round_trip_keeps_yellow_in_range() {
        let frame = RgbImageU8::filled(1, 1, [230, 200, 40]);
        let back = LabPlanes::from_rgb(&frame).to_rgb();
        let px = back.get(0, 0);
        for c in 0..3 {
            let orig = frame.get(0, 0)[c] as i32;
            assert!((px[c] as i32 - orig).abs() <= 3, "{px:?} vs {:?}", frame.get(0, 0));
        }
    }

    #[test]
    fn color_range_is_inclusive() {
        let white = ColorRange::new([200, 200, 200], [255, 255, 255]);
        assert!(white.contains([200, 255, 230]));
        assert!(!white.contains([199, 255, 230]));
        let frame = RgbImageU8::filled(2, 2, [210, 210, 210]);
        assert_eq!(white.mask(&frame).count_nonzero(), 4);
    }
}
