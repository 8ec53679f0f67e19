//! Straight segment detection on a binary edge map.
//!
//! Uses the progressive probabilistic Hough transform:
//!
//! - Edge pixels are visited in a pseudo-random order drawn from a seeded
//!   `StdRng`, so a given map and seed always give the same segments.
//! - Each visited pixel that has not been claimed yet votes in a (theta, rho)
//!   accumulator with `round(pi / theta)` angle bins and `2·(W + H) + 1` rho
//!   bins (at `rho = 1`).
//! - Once the pixel's best bin reaches `threshold`, the corresponding line is
//!   walked in both directions from the pixel in 16.16 fixed point, tolerating
//!   up to `max_line_gap` consecutive misses.
//! - A walk whose extent along either axis reaches `min_line_length` becomes a
//!   segment: its pixels are claimed and their votes removed. Shorter walks
//!   only claim their pixels.
//!
//! Segment order follows the visiting order and carries no meaning.
//!
//! Complexity: O(N · num_angle) votes for N edge pixels, plus line walks.

mod hough;
mod options;
mod segment;

pub use hough::HoughResult;
pub use options::{HoughOptions, DEFAULT_HOUGH_SEED};
pub use segment::LineSegment;

use crate::image::GrayImageU8;

/// Segments found on one edge map, with the number of edge pixels considered.
pub type SegmentDetection = HoughResult;

/// Detect straight segments on a binary edge map (any non-zero cell is an
/// edge). An empty map yields an empty list.
pub fn detect_segments(edges: &GrayImageU8, options: &HoughOptions) -> SegmentDetection {
    hough::HoughExtractor::new(edges, options).extract()
}

#[cfg(test)]
mod tests;
