//! CLI command implementations

pub mod info;
pub mod pixel;
pub mod save;
pub mod solid;
pub mod tiles;

use anyhow::{Context, Result, bail};
use imgview_core::{Image, ImageView, Rect};
use imgview_io::Palette;
use imgview_task::{RunnerConfig, TaskRunner};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    imgview_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// View over `region`, or over the whole image.
pub fn open_view(image: &Image, region: Option<Rect>) -> Result<ImageView> {
    let region = region.unwrap_or_else(|| image.bounds());
    ImageView::new(image, region).with_context(|| format!("Invalid view region {region}"))
}

/// Task runner with `threads` workers (0 = auto).
pub fn runner(threads: usize) -> Result<TaskRunner> {
    TaskRunner::new(&RunnerConfig::new().with_threads(threads))
        .context("Failed to start worker pool")
}

/// Parses `x,y,w,h`.
pub fn parse_region(s: &str) -> Result<Rect, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid region '{s}': {e}"))?;
    match parts[..] {
        [x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(format!("invalid region '{s}': expected x,y,w,h")),
    }
}

/// Loads a palette file: `.act` holds RGB triples, anything else RGBA.
pub fn load_palette(path: &Path) -> Result<Palette> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read palette: {}", path.display()))?;
    let is_act = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("act"));
    let palette = if is_act {
        // Adobe color tables are 768 bytes, optionally followed by a count
        let rgb = if bytes.len() >= 768 { &bytes[..768] } else { &bytes[..] };
        Palette::from_rgb_bytes(rgb)
    } else {
        Palette::from_rgba_bytes(&bytes)
    };
    palette.with_context(|| format!("Invalid palette: {}", path.display()))
}

/// Fails unless `path` is an existing directory, creating it if absent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    std::fs::create_dir_all(path).with_context(|| format!("Failed to create: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
