use crate::segments::LineSegment;
use serde::{Deserialize, Serialize};

/// Line `y = slope · x + intercept` in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlopeIntercept {
    pub slope: f64,
    pub intercept: f64,
}

impl SlopeIntercept {
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line through both endpoints of a segment; `None` when they share a
    /// column.
    pub fn through(segment: &LineSegment) -> Option<Self> {
        if segment.is_vertical() {
            return None;
        }
        let [x1, y1] = segment.p0.map(f64::from);
        let [x2, y2] = segment.p1.map(f64::from);
        let slope = (y2 - y1) / (x2 - x1);
        Some(Self::new(slope, y1 - slope * x1))
    }

    /// Column where the line reaches row `y`; `None` for a horizontal line.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        if self.slope == 0.0 {
            return None;
        }
        Some((y - self.intercept) / self.slope)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneSide {
    Left,
    Right,
}

/// Per-side lines that passed classification.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LaneCandidateSet {
    pub left: Vec<SlopeIntercept>,
    pub right: Vec<SlopeIntercept>,
}

impl LaneCandidateSet {
    pub fn side(&self, side: LaneSide) -> &[SlopeIntercept] {
        match side {
            LaneSide::Left => &self.left,
            LaneSide::Right => &self.right,
        }
    }

    pub fn push(&mut self, side: LaneSide, line: SlopeIntercept) {
        match side {
            LaneSide::Left => self.left.push(line),
            LaneSide::Right => self.right.push(line),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Averaged lane line with its drawable endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneBoundary {
    pub side: LaneSide,
    pub line: SlopeIntercept,
    /// Point on the bottom row.
    pub near: [i32; 2],
    /// Point on the cutoff row.
    pub far: [i32; 2],
    /// Number of candidates averaged into `line`.
    pub support: usize,
}

impl LaneBoundary {
    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.near, self.far)
    }
}
