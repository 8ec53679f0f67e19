use lane_detector::config::overlay;
use lane_detector::image::io::{load_rgb_image, save_gray, save_rgb, write_json_file};
use lane_detector::{DetectedLanes, LaneDetector, PipelineTrace, StageImages};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = overlay::load_config(Path::new(&config_path))?;

    let frame = load_rgb_image(&config.input)?;
    let detector = LaneDetector::new(config.params).map_err(|e| e.to_string())?;
    let (report, stages) = detector
        .process_with_stages(&frame)
        .map_err(|e| e.to_string())?;

    save_rgb(&report.frame, &config.output.annotated_image)?;
    println!(
        "Saved annotated frame to {} ({} lane(s), {:.2} ms)",
        config.output.annotated_image.display(),
        report.lanes.count(),
        report.trace.timing.total_ms
    );

    if let Some(path) = &config.output.lanes_json {
        let summary = LaneSummary {
            lanes: &report.lanes,
            trace: &report.trace,
        };
        write_json_file(path, &summary)?;
        println!("Saved lane summary to {}", path.display());
    }

    if let Some(dir) = &config.output.stages_dir {
        save_stages(&stages, dir)?;
        println!("Saved stage images to {}", dir.display());
    }

    Ok(())
}

fn save_stages(stages: &StageImages, dir: &Path) -> Result<(), String> {
    save_rgb(&stages.resized, &dir.join("01_resized.png"))?;
    save_rgb(&stages.normalized, &dir.join("02_normalized.png"))?;
    save_gray(&stages.mask, &dir.join("03_mask.png"))?;
    save_rgb(&stages.masked, &dir.join("04_masked.png"))?;
    save_gray(&stages.edges, &dir.join("05_edges.png"))?;
    save_gray(&stages.roi_edges, &dir.join("06_roi_edges.png"))?;
    save_rgb(&stages.overlay, &dir.join("07_overlay.png"))
}

fn usage() -> String {
    "Usage: lane_overlay <config.json>".to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaneSummary<'a> {
    lanes: &'a DetectedLanes,
    trace: &'a PipelineTrace,
}
