//! Lane fitting: from detected segments to at most one line per side.
//!
//! 1. Vertical segments (`x1 == x2`) are skipped.
//! 2. Each remaining segment becomes `y = slope · x + intercept`.
//! 3. Segments with `|slope| < min_abs_slope` are dropped as horizontal clutter.
//! 4. `x_bottom = (height − intercept) / slope` (0 for a zero slope).
//! 5. Negative slope with `x_bottom < width/2` is a left candidate, positive
//!    slope with `x_bottom > width/2` a right candidate; anything else is
//!    dropped.
//! 6. Each non-empty side is averaged component-wise (plain mean).
//! 7. The mean line is drawn from `y = height` up to
//!    `y = round(cutoff_fraction · height)`; x is truncated, 0 when undefined.
//!
//! The fitter is stateless: a side without candidates yields no boundary.

mod fit;
mod types;

pub use fit::{average, classify_segments, fit_lanes, to_boundary, FitOptions, FitStats, LaneFit};
pub use types::{LaneBoundary, LaneCandidateSet, LaneSide, SlopeIntercept};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::LineSegment;
    use approx::assert_relative_eq;

    const W: usize = 640;
    const H: usize = 480;

    fn seg(x1: i32, y1: i32, x2: i32, y2: i32) -> LineSegment {
        LineSegment::from([x1, y1, x2, y2])
    }

    #[test]
    fn two_left_segments_average_their_slopes() {
        let segments = [seg(100, 400, 200, 340), seg(100, 400, 200, 320)];
        let fit = fit_lanes(&segments, W, H, &FitOptions::default());
        assert!(fit.right.is_none());
        let left = fit.left.expect("left boundary");
        assert_eq!(left.side, LaneSide::Left);
        assert_eq!(left.support, 2);
        assert_relative_eq!(left.line.slope, -0.7, epsilon = 1e-12);
        assert_relative_eq!(left.line.intercept, 470.0, epsilon = 1e-9);
        // x = (480 - 470) / -0.7 = -14.28..., truncated toward zero.
        assert_eq!(left.near, [-14, 480]);
        assert_eq!(left.far, [225, 312]);
        assert_eq!(left.segment(), seg(-14, 480, 225, 312));
    }

    #[test]
    fn single_right_segment_gives_right_boundary_only() {
        let segments = [seg(400, 320, 500, 420)];
        let fit = fit_lanes(&segments, W, H, &FitOptions::default());
        assert!(fit.left.is_none());
        let right = fit.right.expect("right boundary");
        assert_eq!(right.support, 1);
        assert_relative_eq!(right.line.slope, 1.0);
        assert_eq!(right.near, [560, 480]);
        assert_eq!(right.far, [392, 312]);
        assert_eq!(fit.boundaries().len(), 1);
    }

    #[test]
    fn permutation_gives_identical_lines() {
        let segments = vec![
            seg(100, 400, 200, 340),
            seg(120, 420, 260, 300),
            seg(90, 470, 230, 330),
            seg(400, 320, 500, 420),
            seg(380, 300, 560, 470),
            seg(50, 450, 250, 300),
        ];
        let options = FitOptions::default();
        let reference = fit_lanes(&segments, W, H, &options);
        let mut reversed = segments.clone();
        reversed.reverse();
        let mut rotated = segments.clone();
        rotated.rotate_left(2);
        for permuted in [reversed, rotated] {
            let fit = fit_lanes(&permuted, W, H, &options);
            assert_eq!(fit.left, reference.left);
            assert_eq!(fit.right, reference.right);
        }
    }

    #[test]
    fn shallow_segments_never_become_candidates() {
        let steep = seg(100, 400, 200, 340);
        let shallow = [seg(100, 400, 300, 380), seg(400, 350, 600, 390)];
        let options = FitOptions::default();
        let (only_steep, _) = classify_segments(&[steep], W, H, &options);
        let mut all = vec![steep];
        all.extend_from_slice(&shallow);
        let (mixed, stats) = classify_segments(&all, W, H, &options);
        assert_eq!(mixed, only_steep);
        assert_eq!(stats.shallow, 2);
        assert_eq!(stats.left, 1);
    }

    #[test]
    fn vertical_segments_are_skipped() {
        let segments = [seg(300, 300, 300, 470), seg(10, 0, 10, 479)];
        let fit = fit_lanes(&segments, W, H, &FitOptions::default());
        assert!(fit.left.is_none() && fit.right.is_none());
        assert_eq!(fit.stats.vertical, 2);
        assert!(fit.candidates.is_empty());
    }

    #[test]
    fn slope_inconsistent_with_side_is_dropped() {
        // Negative slope reaching the bottom row right of center.
        let segments = [seg(600, 460, 640, 440)];
        let fit = fit_lanes(&segments, W, H, &FitOptions::default());
        assert!(fit.left.is_none() && fit.right.is_none());
        assert_eq!(fit.stats.inconsistent, 1);
    }

    #[test]
    fn horizontal_segment_without_slope_gate_is_inconsistent() {
        let options = FitOptions {
            min_abs_slope: 0.0,
            ..FitOptions::default()
        };
        let fit = fit_lanes(&[seg(10, 400, 300, 400)], W, H, &options);
        assert_eq!(fit.stats.total, 1);
        assert_eq!(fit.stats.shallow, 0);
        assert_eq!(fit.stats.inconsistent, 1);
        assert_eq!((fit.stats.left, fit.stats.right), (0, 0));
        assert!(fit.candidates.is_empty());
        assert!(fit.boundaries().is_empty());
    }

    #[test]
    fn no_segments_no_boundaries() {
        let fit = fit_lanes(&[], W, H, &FitOptions::default());
        assert_eq!(fit, LaneFit::default());
    }

    #[test]
    fn far_endpoint_sits_on_cutoff_row() {
        for height in [480usize, 481, 720, 101] {
            let line = SlopeIntercept::new(-1.0, height as f64 + 100.0);
            let b = to_boundary(LaneSide::Left, line, 1, height, &FitOptions::default());
            assert_eq!(b.far[1], (0.65 * height as f64).round() as i32);
            assert_eq!(b.near[1], height as i32);
        }
    }

    #[test]
    fn zero_slope_maps_to_column_zero() {
        let b = to_boundary(
            LaneSide::Right,
            SlopeIntercept::new(0.0, 200.0),
            1,
            H,
            &FitOptions::default(),
        );
        assert_eq!(b.near, [0, 480]);
        assert_eq!(b.far, [0, 312]);
    }

    #[test]
    fn options_validation() {
        assert!(FitOptions::default().validate().is_ok());
        let bad = FitOptions {
            cutoff_fraction: 1.5,
            ..FitOptions::default()
        };
        assert!(bad.validate().is_err());
    }
}
