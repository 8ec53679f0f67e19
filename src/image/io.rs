//! I/O helpers for frames, planes and JSON.
//!
//! - `load_rgb_image`: decode a PNG/JPEG/etc. into an owned RGB frame.
//! - `save_rgb`: write an `RgbImageU8` to disk (format from the extension).
//! - `save_gray`: write a `GrayImageU8` to disk.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! These live outside the detection core; the pipeline itself never touches
//! the filesystem.
use super::{GrayImageU8, RgbImageU8};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(RgbImageU8::from_image(img))
}

/// Save an RGB frame.
pub fn save_rgb(frame: &RgbImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    frame
        .to_image()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a single-channel plane (masks and edge maps save as black/white).
pub fn save_gray(plane: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    plane
        .to_image()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
