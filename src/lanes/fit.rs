use super::types::{LaneBoundary, LaneCandidateSet, LaneSide, SlopeIntercept};
use crate::error::Error;
use crate::segments::LineSegment;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Segments flatter than this (in absolute slope) are not lane lines.
    pub min_abs_slope: f64,
    /// Far endpoint row as a fraction of the frame height.
    pub cutoff_fraction: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_abs_slope: 0.4,
            cutoff_fraction: 0.65,
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.min_abs_slope.is_finite() && self.min_abs_slope >= 0.0) {
            return Err(Error::InvalidParams(format!(
                "min_abs_slope must be a non-negative number, got {}",
                self.min_abs_slope
            )));
        }
        if !(self.cutoff_fraction > 0.0 && self.cutoff_fraction <= 1.0) {
            return Err(Error::InvalidParams(format!(
                "cutoff_fraction must lie in (0, 1], got {}",
                self.cutoff_fraction
            )));
        }
        Ok(())
    }
}

/// Where the input segments ended up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitStats {
    pub total: usize,
    /// `x1 == x2`, no slope.
    pub vertical: usize,
    /// `|slope| < min_abs_slope`.
    pub shallow: usize,
    /// Slope sign disagrees with the side the line reaches the bottom row on.
    pub inconsistent: usize,
    pub left: usize,
    pub right: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LaneFit {
    pub left: Option<LaneBoundary>,
    pub right: Option<LaneBoundary>,
    pub candidates: LaneCandidateSet,
    pub stats: FitStats,
}

impl LaneFit {
    pub fn boundaries(&self) -> Vec<LaneBoundary> {
        self.left.into_iter().chain(self.right).collect()
    }
}

/// Side a line belongs to, judged by slope sign and bottom-row crossing.
fn side_of(line: &SlopeIntercept, width: usize, height: usize) -> Option<LaneSide> {
    let x_bottom = line.x_at(height as f64).unwrap_or(0.0);
    let center = width as f64 / 2.0;
    if line.slope < 0.0 && x_bottom < center {
        Some(LaneSide::Left)
    } else if line.slope > 0.0 && x_bottom > center {
        Some(LaneSide::Right)
    } else {
        None
    }
}

/// Sort segments into left/right candidates.
pub fn classify_segments(
    segments: &[LineSegment],
    width: usize,
    height: usize,
    options: &FitOptions,
) -> (LaneCandidateSet, FitStats) {
    let mut candidates = LaneCandidateSet::default();
    let mut stats = FitStats {
        total: segments.len(),
        ..FitStats::default()
    };
    for segment in segments {
        let Some(line) = SlopeIntercept::through(segment) else {
            stats.vertical += 1;
            continue;
        };
        if line.slope.abs() < options.min_abs_slope {
            stats.shallow += 1;
            continue;
        }
        match side_of(&line, width, height) {
            Some(side) => {
                match side {
                    LaneSide::Left => stats.left += 1,
                    LaneSide::Right => stats.right += 1,
                }
                candidates.push(side, line);
            }
            None => stats.inconsistent += 1,
        }
    }
    (candidates, stats)
}

fn ordered_mean(mut values: Vec<f64>) -> f64 {
    // Fixed summation order keeps the mean bit-identical under permutation.
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Component-wise arithmetic mean; `None` for no candidates.
pub fn average(lines: &[SlopeIntercept]) -> Option<SlopeIntercept> {
    if lines.is_empty() {
        return None;
    }
    let slope = ordered_mean(lines.iter().map(|l| l.slope).collect());
    let intercept = ordered_mean(lines.iter().map(|l| l.intercept).collect());
    Some(SlopeIntercept::new(slope, intercept))
}

fn column_at(line: &SlopeIntercept, y: i32) -> i32 {
    match line.x_at(y as f64) {
        Some(x) if x.is_finite() => x.trunc() as i32,
        _ => 0,
    }
}

/// Near endpoint on the bottom row, far endpoint on the cutoff row.
pub fn to_boundary(
    side: LaneSide,
    line: SlopeIntercept,
    support: usize,
    height: usize,
    options: &FitOptions,
) -> LaneBoundary {
    let near_y = height as i32;
    let far_y = (options.cutoff_fraction * height as f64).round() as i32;
    LaneBoundary {
        side,
        line,
        near: [column_at(&line, near_y), near_y],
        far: [column_at(&line, far_y), far_y],
        support,
    }
}

/// Classify, average per side and convert to endpoints. Sides without
/// candidates have no boundary.
pub fn fit_lanes(
    segments: &[LineSegment],
    width: usize,
    height: usize,
    options: &FitOptions,
) -> LaneFit {
    let (candidates, stats) = classify_segments(segments, width, height, options);
    let boundary = |side: LaneSide| {
        let lines = candidates.side(side);
        average(lines).map(|line| to_boundary(side, line, lines.len(), height, options))
    };
    let left = boundary(LaneSide::Left);
    let right = boundary(LaneSide::Right);
    LaneFit {
        left,
        right,
        candidates,
        stats,
    }
}
