//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG into an owned 8-bit gray image.
//! - `save_grayscale_f32`: write a float view in `[0, 1]` to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{Image, ImageView};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<Image<u8>, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(Image::from_vec(width, height, img.into_raw()))
}

/// Save a float image to a grayscale PNG, mapping `[0, 1]` to `[0, 255]`.
pub fn save_grayscale_f32<I>(image: &I, path: &Path) -> Result<(), String>
where
    I: ImageView<Pixel = f32>,
{
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.width() as u32, image.height() as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
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
