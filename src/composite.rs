//! Lane overlay rendering and blending.
//!
//! Boundaries are drawn onto a black overlay as thick lines (a filled quad of
//! the requested thickness plus round caps), then the overlay is blended onto
//! a base frame:
//!
//! `out = saturate(round(frame_weight · base + overlay_weight · overlay + gamma))`
//!
//! Black overlay pixels therefore leave the base only scaled and offset, so a
//! frame without boundaries is `blend(base, black)`.
use crate::error::Error;
use crate::image::RgbImageU8;
use crate::lanes::LaneBoundary;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Frame the overlay is blended onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendBase {
    /// Contrast-normalized frame.
    #[default]
    Normalized,
    /// Input resized to the canonical size, before normalization.
    Resized,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub color: [u8; 3],
    /// Line thickness in pixels.
    pub thickness: u32,
    pub frame_weight: f32,
    pub overlay_weight: f32,
    /// Constant added to every blended channel.
    pub gamma: f32,
    pub base: BlendBase,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            thickness: 8,
            frame_weight: 0.8,
            overlay_weight: 1.0,
            gamma: 1.0,
            base: BlendBase::Normalized,
        }
    }
}

impl OverlayOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.thickness == 0 {
            return Err(Error::InvalidParams(
                "overlay thickness must be at least one pixel".to_string(),
            ));
        }
        let weights = [self.frame_weight, self.overlay_weight, self.gamma];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::InvalidParams(format!(
                "blend weights must be finite, got {weights:?}"
            )));
        }
        Ok(())
    }
}

/// Whether the thick segment can touch the canvas at all.
fn touches_canvas(p0: [i32; 2], p1: [i32; 2], pad: i64, width: usize, height: usize) -> bool {
    let (x0, x1) = (p0[0].min(p1[0]) as i64, p0[0].max(p1[0]) as i64);
    let (y0, y1) = (p0[1].min(p1[1]) as i64, p0[1].max(p1[1]) as i64);
    x1 + pad >= 0 && y1 + pad >= 0 && x0 - pad < width as i64 && y0 - pad < height as i64
}

fn draw_thick_line(canvas: &mut image::RgbImage, p0: [i32; 2], p1: [i32; 2], options: &OverlayOptions) {
    let color = Rgb(options.color);
    let (width, height) = (canvas.width() as usize, canvas.height() as usize);
    let radius = (options.thickness / 2) as i32;
    if !touches_canvas(p0, p1, radius as i64 + 1, width, height) {
        return;
    }

    let [x0, y0] = p0.map(|v| v as f32);
    let [x1, y1] = p1.map(|v| v as f32);
    let len = (x1 - x0).hypot(y1 - y0);
    if len > 0.0 {
        let half = options.thickness as f32 * 0.5;
        let nx = -(y1 - y0) / len * half;
        let ny = (x1 - x0) / len * half;
        let corners = [
            (x0 + nx, y0 + ny),
            (x1 + nx, y1 + ny),
            (x1 - nx, y1 - ny),
            (x0 - nx, y0 - ny),
        ];
        let mut quad: Vec<Point<i32>> = Vec::with_capacity(4);
        for (x, y) in corners {
            let p = Point::new(x.round() as i32, y.round() as i32);
            if quad.last() != Some(&p) {
                quad.push(p);
            }
        }
        while quad.len() > 1 && quad.first() == quad.last() {
            quad.pop();
        }
        if quad.len() >= 3 {
            draw_polygon_mut(canvas, &quad, color);
        } else {
            draw_line_segment_mut(canvas, (x0, y0), (x1, y1), color);
        }
    }
    if radius > 0 {
        draw_filled_circle_mut(canvas, (p0[0], p0[1]), radius, color);
        draw_filled_circle_mut(canvas, (p1[0], p1[1]), radius, color);
    } else if len == 0.0 {
        draw_line_segment_mut(canvas, (x0, y0), (x1, y1), color);
    }
}

/// Black canvas with every boundary drawn from its near to its far point.
pub fn draw_overlay(
    width: usize,
    height: usize,
    boundaries: &[LaneBoundary],
    options: &OverlayOptions,
) -> RgbImageU8 {
    let mut canvas = image::RgbImage::new(width as u32, height as u32);
    if width > 0 && height > 0 {
        for boundary in boundaries {
            let segment = boundary.segment();
            draw_thick_line(&mut canvas, segment.p0, segment.p1, options);
        }
    }
    RgbImageU8::from_image(canvas)
}

/// Weighted per-channel sum of two equally sized frames.
pub fn blend(base: &RgbImageU8, overlay: &RgbImageU8, options: &OverlayOptions) -> Result<RgbImageU8, Error> {
    if base.dimensions() != overlay.dimensions() {
        return Err(Error::SizeMismatch {
            expected: base.data().len(),
            actual: overlay.data().len(),
        });
    }
    let data = base
        .data()
        .iter()
        .zip(overlay.data())
        .map(|(&b, &o)| {
            let v = options.frame_weight * b as f32 + options.overlay_weight * o as f32 + options.gamma;
            v.round().clamp(0.0, 255.0) as u8
        })
        .collect();
    RgbImageU8::from_raw(base.width(), base.height(), data)
}

/// Draw the boundaries and blend them onto `base`.
pub fn composite(base: &RgbImageU8, boundaries: &[LaneBoundary], options: &OverlayOptions) -> RgbImageU8 {
    let overlay = draw_overlay(base.width(), base.height(), boundaries, options);
    // Same dimensions by construction.
    blend(base, &overlay, options).unwrap_or_else(|_| base.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::{LaneSide, SlopeIntercept};

    fn boundary(near: [i32; 2], far: [i32; 2]) -> LaneBoundary {
        LaneBoundary {
            side: LaneSide::Left,
            line: SlopeIntercept::new(-1.0, 0.0),
            near,
            far,
            support: 1,
        }
    }

    #[test]
    fn blend_scales_and_offsets_base() {
        let base = RgbImageU8::filled(2, 2, [100, 200, 255]);
        let overlay = RgbImageU8::new(2, 2);
        let out = blend(&base, &overlay, &OverlayOptions::default()).unwrap();
        // 0.8 * 100 + 1 = 81, 0.8 * 200 + 1 = 161, 0.8 * 255 + 1 = 205
        assert_eq!(out.get(1, 1), [81, 161, 205]);
    }

    #[test]
    fn blend_saturates() {
        let base = RgbImageU8::filled(1, 1, [250, 250, 250]);
        let overlay = RgbImageU8::filled(1, 1, [0, 255, 0]);
        let out = blend(&base, &overlay, &OverlayOptions::default()).unwrap();
        assert_eq!(out.get(0, 0), [201, 255, 201]);
    }

    #[test]
    fn blend_rejects_mismatched_sizes() {
        let base = RgbImageU8::new(4, 4);
        let overlay = RgbImageU8::new(4, 3);
        assert!(matches!(
            blend(&base, &overlay, &OverlayOptions::default()),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn overlay_draws_thick_line() {
        let options = OverlayOptions::default();
        let overlay = draw_overlay(100, 100, &[boundary([50, 90], [50, 20])], &options);
        assert_eq!(overlay.get(50, 50), [0, 255, 0]);
        assert_eq!(overlay.get(47, 50), [0, 255, 0]);
        assert_eq!(overlay.get(53, 50), [0, 255, 0]);
        assert_eq!(overlay.get(40, 50), [0, 0, 0]);
        assert_eq!(overlay.get(50, 5), [0, 0, 0]);
    }

    #[test]
    fn endpoints_off_canvas_are_clipped() {
        let options = OverlayOptions::default();
        let overlay = draw_overlay(64, 48, &[boundary([-14, 48], [30, 31])], &options);
        assert_eq!(overlay.dimensions(), (64, 48));
        assert!(overlay.pixels().any(|p| p == [0, 255, 0]));
        let far_away = draw_overlay(64, 48, &[boundary([-500, 48], [-400, 31])], &options);
        assert!(far_away.pixels().all(|p| p == [0, 0, 0]));
    }

    #[test]
    fn composite_without_boundaries_is_plain_blend() {
        let base = RgbImageU8::filled(8, 6, [40, 80, 120]);
        let options = OverlayOptions::default();
        let out = composite(&base, &[], &options);
        let expected = blend(&base, &RgbImageU8::new(8, 6), &options).unwrap();
        assert_eq!(out, expected);
    }
}
