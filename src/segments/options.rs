use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Seed of the default visiting order; any fixed value gives reproducible runs.
pub const DEFAULT_HOUGH_SEED: u64 = 0x6c61_6e65;

/// Parameters of the progressive probabilistic Hough transform.
///
/// - `rho`/`theta`: accumulator resolution in pixels and radians.
/// - `threshold`: votes a (theta, rho) bin needs before its line is walked.
/// - `min_line_length`: shorter walks are discarded (extent along the
///   dominant axis, in pixels).
/// - `max_line_gap`: consecutive empty pixels tolerated while walking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    pub rho: f64,
    pub theta: f64,
    pub threshold: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
    /// Stop after this many segments; `None` keeps all of them.
    pub max_lines: Option<usize>,
    pub seed: u64,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: PI / 180.0,
            threshold: 30,
            min_line_length: 50,
            max_line_gap: 30,
            max_lines: None,
            seed: DEFAULT_HOUGH_SEED,
        }
    }
}

impl HoughOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.rho.is_finite() && self.rho > 0.0) {
            return Err(Error::InvalidParams(format!(
                "Hough rho must be positive, got {}",
                self.rho
            )));
        }
        if !(self.theta.is_finite() && self.theta > 0.0 && self.theta <= PI) {
            return Err(Error::InvalidParams(format!(
                "Hough theta must lie in (0, pi], got {}",
                self.theta
            )));
        }
        if self.threshold == 0 {
            return Err(Error::InvalidParams(
                "Hough threshold must be at least one vote".to_string(),
            ));
        }
        Ok(())
    }
}
