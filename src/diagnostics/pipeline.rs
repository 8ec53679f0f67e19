use crate::diagnostics::{EdgeStage, FitStage, PreprocessStage, RoiStage, SegmentStage, TimingBreakdown};
use crate::image::RgbImageU8;
use crate::lanes::LaneBoundary;
use serde::Serialize;

/// Result produced by [`LaneDetector::process`](crate::LaneDetector::process).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Annotated frame at the canonical resolution.
    #[serde(skip)]
    pub frame: RgbImageU8,
    pub lanes: DetectedLanes,
    pub trace: PipelineTrace,
}

/// Zero, one or two lane boundaries found in a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<LaneBoundary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<LaneBoundary>,
}

impl DetectedLanes {
    pub fn boundaries(&self) -> Vec<LaneBoundary> {
        self.left.into_iter().chain(self.right).collect()
    }

    pub fn count(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }
}

/// End-to-end trace describing one detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub preprocess: PreprocessStage,
    pub edges: EdgeStage,
    pub roi: RoiStage,
    pub segments: SegmentStage,
    pub fit: FitStage,
    pub timing: TimingBreakdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub canonical_width: usize,
    pub canonical_height: usize,
}

impl InputDescriptor {
    pub fn resized(&self) -> bool {
        (self.width, self.height) != (self.canonical_width, self.canonical_height)
    }
}
