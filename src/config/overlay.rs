use crate::detector::LaneParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct OverlayToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Detector parameters; omitted fields keep their defaults.
    #[serde(default)]
    pub params: LaneParams,
    pub output: OverlayOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OverlayOutputConfig {
    /// Annotated frame (PNG or JPEG by extension).
    #[serde(rename = "annotated_image")]
    pub annotated_image: PathBuf,
    /// Detected lanes plus the pipeline trace.
    #[serde(rename = "lanes_json", default)]
    pub lanes_json: Option<PathBuf>,
    /// Directory receiving one image per intermediate stage.
    #[serde(rename = "stages_dir", default)]
    pub stages_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<OverlayToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<OverlayToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}
