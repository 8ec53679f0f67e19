//! Diagnostics data model returned by the detector.
//!
//! `DetectionReport` is the main entry point: the annotated frame, the lanes,
//! and a `PipelineTrace` with one serializable record per stage plus timings.
//! Everything here is plain data; the detector fills it in as it runs.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{DetectedLanes, DetectionReport, InputDescriptor, PipelineTrace};
pub use stages::{EdgeStage, FitStage, PreprocessStage, RoiStage, SegmentStage};
pub use timing::{timed, StageTiming, TimingBreakdown};
