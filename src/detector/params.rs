//! Parameter types configuring the detector stages.
//!
//! Every tunable constant of the pipeline lives in one of the nested option
//! structs. All of them deserialize with `#[serde(default)]`, so a JSON config
//! only needs the fields it overrides.

use crate::composite::OverlayOptions;
use crate::edges::EdgeOptions;
use crate::error::Error;
use crate::lanes::FitOptions;
use crate::preprocess::PreprocessOptions;
use crate::roi::RoiOptions;
use crate::segments::HoughOptions;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters, one block per stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    /// Resize, CLAHE and color masks.
    pub preprocess: PreprocessOptions,
    /// Blur and adaptive Canny.
    pub edges: EdgeOptions,
    /// Trapezoid vertices as frame fractions.
    pub roi: RoiOptions,
    /// Probabilistic Hough parameters.
    pub hough: HoughOptions,
    /// Slope gate and far-endpoint cutoff.
    pub fit: FitOptions,
    /// Line drawing and blending.
    pub overlay: OverlayOptions,
}

impl LaneParams {
    /// Check every block, including the ROI against the fitting cutoff.
    pub fn validate(&self) -> Result<(), Error> {
        self.preprocess.validate()?;
        self.edges.validate()?;
        self.fit.validate()?;
        self.roi.validate(self.fit.cutoff_fraction)?;
        self.hough.validate()?;
        self.overlay.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LaneParams::default().validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{ "hough": { "threshold": 40 }, "overlay": { "thickness": 4, "base": "resized" } }"#;
        let params: LaneParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.hough.threshold, 40);
        assert_eq!(params.hough.min_line_length, 50);
        assert_eq!(params.overlay.thickness, 4);
        assert_eq!(params.overlay.base, crate::composite::BlendBase::Resized);
        assert_eq!(params.preprocess, PreprocessOptions::default());
    }

    #[test]
    fn invalid_blocks_are_reported() {
        let mut params = LaneParams::default();
        params.edges.blur_kernel = 4;
        assert!(matches!(params.validate(), Err(Error::InvalidParams(_))));

        let mut params = LaneParams::default();
        params.fit.cutoff_fraction = 0.5;
        assert!(params.validate().is_err(), "ROI top below cutoff must fail");

        let mut params = LaneParams::default();
        params.preprocess.canonical_size = (0, 480);
        assert!(params.validate().is_err());
    }
}
