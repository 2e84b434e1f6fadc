use grid_distance::config::load_json_config;
use grid_distance::distance::is_far;
use grid_distance::image::io::{load_grayscale_image, save_grayscale_f32, write_json_file};
use grid_distance::image::Image;
use grid_distance::{DistanceReport, ExecutorConfig, GridExecutor, Norm};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DistanceToolConfig {
    pub input: PathBuf,
    /// Gray level that marks seed pixels.
    #[serde(default = "default_seed_value")]
    pub seed_value: u8,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default)]
    pub executor: ExecutorConfig,
    pub output: DistanceOutputConfig,
}

fn default_seed_value() -> u8 {
    255
}

#[derive(Debug, Deserialize)]
pub struct DistanceOutputConfig {
    pub distance_image: PathBuf,
    pub report_json: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: DistanceToolConfig = load_json_config(Path::new(&config_path))?;
    config.executor.validate()?;

    let executor = GridExecutor::from_config(&config.executor).map_err(|e| e.to_string())?;
    let gray = load_grayscale_image(&config.input)?;
    let seed_count = gray.data.iter().filter(|&&v| v == config.seed_value).count();

    let (distance, report) = executor
        .distance_transform(&gray.view(), config.seed_value, config.norm)
        .map_err(|e| e.to_string())?;

    let max_distance = distance
        .data
        .iter()
        .copied()
        .filter(|&v| !is_far(v))
        .fold(0.0f32, f32::max);
    let scale = if max_distance > 0.0 { 1.0 / max_distance } else { 0.0 };
    let mut normalized = Image::<f32>::new(distance.w, distance.h);
    executor.transform(&distance.view(), normalized.view_mut(), move |v: f32| {
        if is_far(v) {
            1.0
        } else {
            v * scale
        }
    });

    save_grayscale_f32(&normalized, &config.output.distance_image)?;
    let summary = DistanceSummary {
        input: config.input.display().to_string(),
        seed_value: config.seed_value,
        seed_count,
        max_distance,
        report,
    };
    write_json_file(&config.output.report_json, &summary)?;

    println!(
        "{:?} distance over {}x{} ({} seeds, {:?}, {} workers) in {:.3} ms",
        config.norm,
        summary.report.width,
        summary.report.height,
        seed_count,
        summary.report.route,
        summary.report.workers,
        summary.report.timing.total_ms
    );
    println!(
        "Saved distance image to {}",
        config.output.distance_image.display()
    );
    println!("Saved report to {}", config.output.report_json.display());

    Ok(())
}

fn usage() -> String {
    "Usage: distance_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DistanceSummary {
    input: String,
    seed_value: u8,
    seed_count: usize,
    max_distance: f32,
    report: DistanceReport,
}
