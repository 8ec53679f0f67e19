use crate::edges::AdaptiveThresholds;
use crate::lanes::{FitStats, LaneBoundary, LaneCandidateSet};
use crate::roi::RoiPolygon;
use crate::segments::LineSegment;
use serde::Serialize;

/// Color masking outcome on the canonical frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessStage {
    pub elapsed_ms: f64,
    /// Pixels inside the white or yellow range.
    pub lane_pixels: usize,
    pub lane_fraction: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStage {
    pub elapsed_ms: f64,
    pub thresholds: AdaptiveThresholds,
    pub edge_count: usize,
    pub gradient_ms: f64,
    pub nms_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiStage {
    pub elapsed_ms: f64,
    pub polygon: RoiPolygon,
    pub edges_kept: usize,
    pub edges_dropped: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStage {
    pub elapsed_ms: f64,
    pub edge_pixels: usize,
    pub segments: Vec<LineSegment>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitStage {
    pub elapsed_ms: f64,
    pub stats: FitStats,
    pub candidates: LaneCandidateSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<LaneBoundary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<LaneBoundary>,
}
