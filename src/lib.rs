#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Stage modules – public so tools can run stages in isolation.
pub mod color;
pub mod composite;
pub mod edges;
pub mod filters;
pub mod lanes;
pub mod preprocess;
pub mod roi;
pub mod segments;

// Tool configuration (JSON) for the bundled binary.
pub mod config;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{LaneDetector, LaneParams, StageImages};
pub use crate::error::Error;
pub use crate::lanes::{LaneBoundary, LaneSide, SlopeIntercept};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{DetectedLanes, DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_detector::prelude::*;
///
/// # fn main() -> Result<(), Error> {
/// let (w, h) = (640usize, 480usize);
/// let frame = RgbImageU8::from_raw(w, h, vec![0u8; w * h * 3])?;
///
/// let detector = LaneDetector::new(LaneParams::default())?;
/// let report = detector.process(&frame)?;
/// println!("lanes={} total_ms={:.3}", report.lanes.count(), report.trace.timing.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RgbImageU8;
    pub use crate::{DetectionReport, Error, LaneDetector, LaneParams};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::composite::{blend, composite, draw_overlay};
    pub use crate::edges::extract_edges;
    pub use crate::lanes::fit_lanes;
    pub use crate::preprocess::preprocess;
    pub use crate::roi::{restrict_to_roi, roi_mask};
    pub use crate::segments::detect_segments;

    // Stage options and outputs.
    pub use crate::composite::{BlendBase, OverlayOptions};
    pub use crate::edges::{EdgeExtraction, EdgeOptions};
    pub use crate::lanes::{FitOptions, LaneFit};
    pub use crate::preprocess::{Preprocessed, PreprocessOptions};
    pub use crate::roi::{RoiOptions, RoiPolygon};
    pub use crate::segments::{HoughOptions, LineSegment, SegmentDetection};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        EdgeStage, FitStage, InputDescriptor, PreprocessStage, RoiStage, SegmentStage,
        StageTiming, TimingBreakdown,
    };
}
