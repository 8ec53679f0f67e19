//! Trapezoidal region of interest in front of the vehicle.
//!
//! Vertices are stored as fractions of (width, height) and converted to pixels
//! per frame, so the geometry is resolution independent. Pixel coordinates are
//! truncated toward zero. The default trapezoid spans the lower-central part
//! of the frame:
//!
//! ```text
//!        (0.4w, 0.65h) ____ (0.6w, 0.65h)
//!                     /    \
//!                    /      \
//!     (0.1w, h) ----/        \---- (0.9w, h)
//! ```
use crate::error::Error;
use crate::image::{GrayImageU8, ImageView};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use image::Luma;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiOptions {
    /// Fractional vertices in order bottom-left, top-left, top-right,
    /// bottom-right.
    pub vertices: [[f64; 2]; 4],
}

impl Default for RoiOptions {
    fn default() -> Self {
        Self {
            vertices: [[0.1, 1.0], [0.4, 0.65], [0.6, 0.65], [0.9, 1.0]],
        }
    }
}

impl RoiOptions {
    /// Check the trapezoid shape and that its top edge does not sit below the
    /// lane fitting cutoff.
    pub fn validate(&self, cutoff_fraction: f64) -> Result<(), Error> {
        let [bl, tl, tr, br] = self.vertices;
        if self
            .vertices
            .iter()
            .flatten()
            .any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0)
        {
            return Err(Error::InvalidParams(
                "ROI vertices must be fractions in [0, 1]".to_string(),
            ));
        }
        let top_width = tr[0] - tl[0];
        let bottom_width = br[0] - bl[0];
        if top_width < 0.0 || bottom_width <= 0.0 || top_width >= bottom_width {
            return Err(Error::InvalidParams(format!(
                "ROI top edge ({top_width}) must be narrower than its bottom edge ({bottom_width})"
            )));
        }
        let top_y = tl[1].min(tr[1]);
        let bottom_y = bl[1].max(br[1]);
        if top_y >= bottom_y {
            return Err(Error::InvalidParams(
                "ROI top edge must lie above its bottom edge".to_string(),
            ));
        }
        if tl[1].max(tr[1]) > cutoff_fraction {
            return Err(Error::InvalidParams(format!(
                "ROI top edge lies below the lane cutoff fraction {cutoff_fraction}"
            )));
        }
        Ok(())
    }
}

/// ROI in pixel coordinates of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoiPolygon {
    pub vertices: [[i32; 2]; 4],
}

impl RoiPolygon {
    pub fn for_frame(width: usize, height: usize, options: &RoiOptions) -> Self {
        let vertices = options
            .vertices
            .map(|[fx, fy]| [(width as f64 * fx) as i32, (height as f64 * fy) as i32]);
        Self { vertices }
    }

    /// Distinct vertices in drawing order, without a closing duplicate.
    fn distinct_points(&self) -> Vec<Point<i32>> {
        let mut points: Vec<Point<i32>> = Vec::with_capacity(4);
        for [x, y] in self.vertices {
            let p = Point::new(x, y);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}

/// Rasterize the polygon (interior and boundary) as a 255/0 mask.
/// Polygons with fewer than three distinct vertices mask everything out.
pub fn roi_mask(polygon: &RoiPolygon, width: usize, height: usize) -> GrayImageU8 {
    let points = polygon.distinct_points();
    let mut canvas = image::GrayImage::new(width as u32, height as u32);
    if points.len() >= 3 && width > 0 && height > 0 {
        draw_polygon_mut(&mut canvas, &points, Luma([255u8]));
    }
    GrayImageU8::from_image(canvas)
}

/// Keep only edges inside the ROI (pixel-wise AND with the polygon mask).
pub fn restrict_to_roi(edges: &GrayImageU8, polygon: &RoiPolygon) -> GrayImageU8 {
    let (w, h) = edges.dimensions();
    edges.and(&roi_mask(polygon, w, h))
}
