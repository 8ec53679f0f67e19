//! Detector pipeline driving lane detection end-to-end.
//!
//! Stages
//! - Preprocess: resize to the canonical size, CLAHE on lightness, white and
//!   yellow masks applied to the normalized frame.
//! - Edges: luma, Gaussian blur, median-adaptive Canny.
//! - ROI: keep edges inside the road trapezoid.
//! - Segments: seeded probabilistic Hough transform.
//! - Fit: slope/side classification and per-side averaging.
//! - Composite: draw the boundaries and blend them onto the base frame.
//!
//! Typical usage:
//! ```no_run
//! use lane_detector::{LaneDetector, LaneParams};
//! use lane_detector::image::RgbImageU8;
//!
//! # fn example(frame: RgbImageU8) -> Result<(), lane_detector::Error> {
//! let detector = LaneDetector::new(LaneParams::default())?;
//! let report = detector.process(&frame)?;
//! println!("lanes found: {}", report.lanes.count());
//! # Ok(())
//! # }
//! ```
use super::params::LaneParams;
use crate::composite::{blend, draw_overlay, BlendBase};
use crate::diagnostics::{
    timed, DetectedLanes, DetectionReport, EdgeStage, FitStage, InputDescriptor, PipelineTrace,
    PreprocessStage, RoiStage, SegmentStage, TimingBreakdown,
};
use crate::edges::extract_edges;
use crate::error::Error;
use crate::image::{GrayImageU8, RgbImageU8};
use crate::lanes::fit_lanes;
use crate::preprocess::preprocess;
use crate::roi::{restrict_to_roi, RoiPolygon};
use crate::segments::detect_segments;
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Intermediate buffers of one run, all at the canonical size.
#[derive(Clone, Debug)]
pub struct StageImages {
    pub resized: RgbImageU8,
    pub normalized: RgbImageU8,
    pub mask: GrayImageU8,
    pub masked: RgbImageU8,
    pub edges: GrayImageU8,
    pub roi_edges: GrayImageU8,
    pub overlay: RgbImageU8,
}

/// Single-frame lane detector.
///
/// Holds only validated, immutable parameters: every call is an independent
/// run and one detector can be shared across threads.
#[derive(Clone, Debug)]
pub struct LaneDetector {
    params: LaneParams,
}

impl Default for LaneDetector {
    fn default() -> Self {
        Self {
            params: LaneParams::default(),
        }
    }
}

impl LaneDetector {
    /// Create a detector, rejecting inconsistent parameters.
    pub fn new(params: LaneParams) -> Result<Self, Error> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Detect lanes and return the annotated frame with a full trace.
    pub fn process(&self, frame: &RgbImageU8) -> Result<DetectionReport, Error> {
        self.run(frame).map(|(report, _)| report)
    }

    /// Same as [`process`](Self::process) but also hands back every
    /// intermediate buffer.
    pub fn process_with_stages(
        &self,
        frame: &RgbImageU8,
    ) -> Result<(DetectionReport, StageImages), Error> {
        self.run(frame)
    }

    /// Annotated canonical-size frame only.
    pub fn annotate(&self, frame: &RgbImageU8) -> Result<RgbImageU8, Error> {
        self.process(frame).map(|report| report.frame)
    }

    /// Process independent frames in parallel; results keep the input order.
    pub fn process_batch(&self, frames: &[RgbImageU8]) -> Vec<Result<DetectionReport, Error>> {
        frames.par_iter().map(|frame| self.process(frame)).collect()
    }

    fn run(&self, frame: &RgbImageU8) -> Result<(DetectionReport, StageImages), Error> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "frame has zero area ({width}x{height})"
            )));
        }
        let total_start = Instant::now();
        let params = &self.params;
        let mut timing = TimingBreakdown::default();

        let (pre, preprocess_ms) = timed(|| preprocess(frame, &params.preprocess));
        timing.push("preprocess", preprocess_ms);
        let (cw, ch) = pre.masked.dimensions();
        let lane_pixels = pre.mask.count_nonzero();
        debug!(
            "LaneDetector::process input={}x{} canonical={}x{} lane_pixels={}",
            width, height, cw, ch, lane_pixels
        );

        let (edges, edges_ms) = timed(|| extract_edges(&pre.masked, &params.edges));
        timing.push("edges", edges_ms);
        debug!(
            "LaneDetector::process median={:.1} canny=({}, {}) edges={} grad={:.3}ms nms={:.3}ms",
            edges.thresholds.median,
            edges.thresholds.canny.low,
            edges.thresholds.canny.high,
            edges.edge_count,
            edges.gradient_ms,
            edges.nms_ms
        );

        let ((polygon, roi_edges), roi_ms) = timed(|| {
            let polygon = RoiPolygon::for_frame(cw, ch, &params.roi);
            let restricted = restrict_to_roi(&edges.edges, &polygon);
            (polygon, restricted)
        });
        timing.push("roi", roi_ms);
        let edges_kept = roi_edges.count_nonzero();
        if edges_kept == 0 {
            debug!("LaneDetector::process empty edge map inside ROI");
        }

        let (detection, segments_ms) = timed(|| detect_segments(&roi_edges, &params.hough));
        timing.push("segments", segments_ms);
        debug!(
            "LaneDetector::process roi_edges={} segments={}",
            edges_kept,
            detection.segments.len()
        );

        let (fit, fit_ms) = timed(|| fit_lanes(&detection.segments, cw, ch, &params.fit));
        timing.push("fit", fit_ms);
        debug!(
            "LaneDetector::process candidates left={} right={} (vertical={} shallow={} inconsistent={})",
            fit.candidates.left.len(),
            fit.candidates.right.len(),
            fit.stats.vertical,
            fit.stats.shallow,
            fit.stats.inconsistent
        );
        if fit.left.is_none() {
            debug!("LaneDetector::process no left lane candidates");
        }
        if fit.right.is_none() {
            debug!("LaneDetector::process no right lane candidates");
        }

        let lanes = DetectedLanes {
            left: fit.left,
            right: fit.right,
        };
        let base = match params.overlay.base {
            BlendBase::Normalized => &pre.normalized,
            BlendBase::Resized => &pre.resized,
        };
        let ((overlay, annotated), composite_ms) = timed(|| {
            let overlay = draw_overlay(cw, ch, &lanes.boundaries(), &params.overlay);
            let annotated = blend(base, &overlay, &params.overlay);
            (overlay, annotated)
        });
        let annotated = annotated?;
        timing.push("composite", composite_ms);
        timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

        let trace = PipelineTrace {
            input: InputDescriptor {
                width,
                height,
                canonical_width: cw,
                canonical_height: ch,
            },
            preprocess: PreprocessStage {
                elapsed_ms: preprocess_ms,
                lane_pixels,
                lane_fraction: lane_pixels as f64 / (cw * ch).max(1) as f64,
            },
            edges: EdgeStage {
                elapsed_ms: edges_ms,
                thresholds: edges.thresholds,
                edge_count: edges.edge_count,
                gradient_ms: edges.gradient_ms,
                nms_ms: edges.nms_ms,
            },
            roi: RoiStage {
                elapsed_ms: roi_ms,
                polygon,
                edges_kept,
                edges_dropped: edges.edge_count - edges_kept,
            },
            segments: SegmentStage {
                elapsed_ms: segments_ms,
                edge_pixels: detection.edge_pixels,
                segments: detection.segments,
            },
            fit: FitStage {
                elapsed_ms: fit_ms,
                stats: fit.stats,
                candidates: fit.candidates,
                left: fit.left,
                right: fit.right,
            },
            timing,
        };
        let report = DetectionReport {
            frame: annotated,
            lanes,
            trace,
        };
        let stages = StageImages {
            resized: pre.resized,
            normalized: pre.normalized,
            mask: pre.mask,
            masked: pre.masked,
            edges: edges.edges,
            roi_edges,
            overlay,
        };
        Ok((report, stages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_invalid_input() {
        let detector = LaneDetector::default();
        let err = detector.process(&RgbImageU8::new(0, 10)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn new_rejects_invalid_params() {
        let mut params = LaneParams::default();
        params.hough.rho = -1.0;
        assert!(LaneDetector::new(params).is_err());
    }

    #[test]
    fn gray_frame_has_no_lanes_and_canonical_output() {
        let detector = LaneDetector::default();
        let frame = RgbImageU8::filled(320, 240, [90, 90, 90]);
        let (report, stages) = detector.process_with_stages(&frame).unwrap();
        assert_eq!(report.frame.dimensions(), (640, 480));
        assert_eq!(report.lanes.count(), 0);
        assert!(report.trace.input.resized());
        assert_eq!(stages.roi_edges.count_nonzero(), 0);
        let labels: Vec<&str> = report
            .trace
            .timing
            .stages
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, ["preprocess", "edges", "roi", "segments", "fit", "composite"]);
    }
}
