use lane_detector::image::RgbImageU8;

pub const ROAD_GRAY: [u8; 3] = [70, 70, 70];
pub const PAINT_WHITE: [u8; 3] = [255, 255, 255];

/// Painted stroke between two points, in pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Stroke {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub width: f32,
    pub color: [u8; 3],
}

impl Stroke {
    pub fn white(from: [f32; 2], to: [f32; 2], width: f32) -> Self {
        Self {
            from,
            to,
            width,
            color: PAINT_WHITE,
        }
    }

    fn distance(&self, x: f32, y: f32) -> f32 {
        let [x0, y0] = self.from;
        let [x1, y1] = self.to;
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq > 0.0 {
            (((x - x0) * dx + (y - y0) * dy) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (px, py) = (x0 + t * dx, y0 + t * dy);
        ((x - px).powi(2) + (y - py).powi(2)).sqrt()
    }
}

/// Uniform road surface with the given strokes painted on top.
pub fn road_scene(width: usize, height: usize, strokes: &[Stroke]) -> RgbImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut frame = RgbImageU8::filled(width, height, ROAD_GRAY);
    for y in 0..height {
        for x in 0..width {
            let (xf, yf) = (x as f32, y as f32);
            if let Some(stroke) = strokes
                .iter()
                .find(|s| s.distance(xf, yf) <= s.width * 0.5)
            {
                frame.set(x, y, stroke.color);
            }
        }
    }
    frame
}

/// Left and right lane markings converging toward the horizon, scaled to
/// `width × height` from a 640×480 layout.
pub fn two_lane_scene(width: usize, height: usize) -> RgbImageU8 {
    let sx = width as f32 / 640.0;
    let sy = height as f32 / 480.0;
    let lane_width = 6.0 * sx.max(sy);
    road_scene(
        width,
        height,
        &[
            Stroke::white([150.0 * sx, 479.0 * sy], [290.0 * sx, 320.0 * sy], lane_width),
            Stroke::white([490.0 * sx, 479.0 * sy], [350.0 * sx, 320.0 * sy], lane_width),
        ],
    )
}

/// Only the left marking of [`two_lane_scene`].
pub fn left_lane_scene(width: usize, height: usize) -> RgbImageU8 {
    road_scene(
        width,
        height,
        &[Stroke::white([150.0, 479.0], [290.0, 320.0], 6.0)],
    )
}
